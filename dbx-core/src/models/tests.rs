//! Tests for the metadata entities.

use super::*;

fn column(name: &str, ordinal: u32) -> Column {
    Column::builder(name)
        .data_type("int4")
        .ordinal_position(ordinal)
        .build()
}

#[test]
fn test_column_builder_defaults() {
    let col = Column::builder("id").build();
    assert_eq!(col.name(), "id");
    assert!(col.is_nullable());
    assert!(!col.is_primary_key());
    assert!(!col.is_auto_increment());
    assert_eq!(col.default_value(), None);
    assert_eq!(col.comment(), None);
}

#[test]
fn test_column_to_builder_replaces_without_mutating() {
    let original = Column::builder("email")
        .data_type("varchar")
        .size(255)
        .nullable(false)
        .ordinal_position(3)
        .build();

    let marked = original.to_builder().primary_key(true).build();

    assert!(!original.is_primary_key());
    assert!(marked.is_primary_key());
    assert_eq!(marked.size(), 255);
    assert_eq!(marked.ordinal_position(), 3);
    assert_eq!(marked.data_type(), "varchar");
}

#[test]
fn test_has_comment_ignores_empty_text() {
    let empty = Column::builder("a").comment(Some(String::new())).build();
    let set = Column::builder("b").comment(Some("note".to_string())).build();
    assert!(!empty.has_comment());
    assert!(set.has_comment());
}

#[test]
fn test_primary_key_without_columns_is_absent() {
    assert!(PrimaryKey::builder().name(Some("pk".into())).build().is_none());

    let pk = PrimaryKey::builder()
        .name(Some("orders_pkey".into()))
        .columns(["tenant_id", "order_id"])
        .build();
    let pk = pk.as_ref();
    assert_eq!(pk.map(PrimaryKey::columns).map(<[String]>::len), Some(2));
    assert!(pk.is_some_and(|k| k.contains("order_id")));
}

#[test]
fn test_table_build_orders_columns_by_ordinal() {
    let table = Table::builder("users")
        .column(column("email", 3))
        .column(column("id", 1))
        .column(column("name", 2))
        .build();

    assert_eq!(table.column_names(), vec!["id", "name", "email"]);
    assert!(table.find_column("name").is_some());
    assert!(table.find_column("missing").is_none());
}

#[test]
fn test_foreign_key_pairs_stay_aligned() {
    let fk = ForeignKey::builder("fk_line_order")
        .referenced_table("orders")
        .column_pair("tenant_id", "tenant_id")
        .column_pair("order_id", "id")
        .on_delete(ForeignKeyAction::Cascade)
        .build();

    let pairs: Vec<_> = fk.column_pairs().collect();
    assert_eq!(pairs, vec![("tenant_id", "tenant_id"), ("order_id", "id")]);
    assert_eq!(fk.on_update(), ForeignKeyAction::NoAction);
    assert_eq!(fk.on_delete(), ForeignKeyAction::Cascade);
}

#[test]
fn test_rule_code_mapping() {
    assert_eq!(ForeignKeyAction::from_rule_code(0), ForeignKeyAction::Cascade);
    assert_eq!(ForeignKeyAction::from_rule_code(1), ForeignKeyAction::Restrict);
    assert_eq!(ForeignKeyAction::from_rule_code(2), ForeignKeyAction::SetNull);
    assert_eq!(ForeignKeyAction::from_rule_code(3), ForeignKeyAction::NoAction);
    assert_eq!(ForeignKeyAction::from_rule_code(4), ForeignKeyAction::SetDefault);
    assert_eq!(ForeignKeyAction::from_rule_code(99), ForeignKeyAction::NoAction);
}

#[test]
fn test_index_type_and_sort_order_mapping() {
    assert_eq!(IndexType::from_type_code(1), IndexType::Clustered);
    assert_eq!(IndexType::from_type_code(2), IndexType::Hash);
    assert_eq!(IndexType::from_type_code(3), IndexType::Btree);
    assert_eq!(IndexType::from_type_code(0), IndexType::Other);
    assert_eq!(IndexType::from_type_code(42), IndexType::Other);

    assert_eq!(SortOrder::from_marker(Some("D")), SortOrder::Desc);
    assert_eq!(SortOrder::from_marker(Some("a")), SortOrder::Asc);
    assert_eq!(SortOrder::from_marker(None), SortOrder::Unknown);
}

#[test]
fn test_trigger_and_parameter_text_parsing() {
    assert_eq!(TriggerTiming::parse("INSTEAD OF"), TriggerTiming::InsteadOf);
    assert_eq!(TriggerTiming::parse("before"), TriggerTiming::Before);
    assert_eq!(TriggerTiming::parse("whenever"), TriggerTiming::After);
    assert_eq!(TriggerEvent::parse("TRUNCATE"), TriggerEvent::Truncate);
    assert_eq!(TriggerEvent::parse("UNKNOWN"), TriggerEvent::Insert);

    assert_eq!(ParameterMode::parse("INOUT"), ParameterMode::Inout);
    assert_eq!(ParameterMode::from_kind_code(4), ParameterMode::Out);
    assert_eq!(ParameterMode::from_kind_code(5), ParameterMode::Return);
    assert_eq!(ParameterMode::from_kind_code(3), ParameterMode::In);
}

#[test]
fn test_database_counts_and_lookup() {
    let sales = Schema::builder("sales")
        .table(Table::builder("orders").build())
        .table(Table::builder("customers").build())
        .view(View::builder("order_totals").build())
        .procedures([Procedure::builder("close_month").build()])
        .build();
    let hr = Schema::builder("hr")
        .table(Table::builder("staff").build())
        .build();

    let db = Database::builder()
        .product_name("PostgreSQL")
        .schemas([hr, sales])
        .warnings(["Permission denied for schema: audit".to_string()])
        .build();

    assert_eq!(db.total_table_count(), 3);
    assert_eq!(db.total_view_count(), 1);
    assert_eq!(db.total_procedure_count(), 1);
    assert!(db.find_schema("sales").and_then(|s| s.find_table("orders")).is_some());
    assert!(db.find_schema("sales").and_then(|s| s.find_view("order_totals")).is_some());
    assert!(db.find_schema("missing").is_none());
    assert_eq!(db.warnings().len(), 1);
}

#[test]
fn test_enum_serialization_uses_upper_snake_case() {
    let json = serde_json::to_string(&ForeignKeyAction::SetNull).unwrap();
    assert_eq!(json, "\"SET_NULL\"");
    let json = serde_json::to_string(&TriggerTiming::InsteadOf).unwrap();
    assert_eq!(json, "\"INSTEAD_OF\"");
    let json = serde_json::to_string(&TableType::SystemTable).unwrap();
    assert_eq!(json, "\"SYSTEM_TABLE\"");
}

#[test]
fn test_absent_optionals_are_omitted_from_json() {
    let table = Table::builder("t").column(column("id", 1)).build();
    let value = serde_json::to_value(&table).unwrap();

    assert!(value.get("primary_key").is_none());
    assert!(value.get("comment").is_none());
    assert!(value["columns"][0].get("default_value").is_none());
    assert_eq!(value["table_type"], "TABLE");
}

#[test]
fn test_database_json_roundtrip_preserves_tree() {
    let db = Database::builder()
        .product_name("MySQL")
        .product_version("8.0.36")
        .schema(
            Schema::builder("shop")
                .catalog(Some("shop".into()))
                .table(
                    Table::builder("orders")
                        .column(column("id", 1))
                        .primary_key(PrimaryKey::builder().column("id").build())
                        .build(),
                )
                .build(),
        )
        .build();

    let json = serde_json::to_string(&db).unwrap();
    let back: Database = serde_json::from_str(&json).unwrap();
    assert_eq!(back, db);
}
