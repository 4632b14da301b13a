//! The extraction algorithm shared by every vendor.

use super::profile::{ProcedureFailurePolicy, SchemaModel, VendorProfile};
use super::{MetadataStrategy, Warnings};
use crate::models::{
    Column, Database, ForeignKey, ForeignKeyAction, ForeignKeyBuilder, Index, IndexBuilder,
    IndexType, Parameter, ParameterMode, PrimaryKey, Procedure, ProcedureKind, Schema, SortOrder,
    Table, TableType, Trigger, TriggerEvent, TriggerTiming, View,
};
use crate::source::{CatalogSource, ColumnRow, ObjectName, QueryRow, codes};
use crate::{MetadataError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// Generic extraction pipeline parameterized by a [`VendorProfile`].
///
/// The portable catalog rows drive the walk; vendor queries from the
/// profile only enrich it (comments, view bodies, triggers, routines).
/// Enrichment is best-effort: a failing vendor query never loses the
/// object it was enriching.
#[derive(Debug, Clone)]
pub struct CatalogStrategy {
    profile: VendorProfile,
}

impl CatalogStrategy {
    /// Strategy driven by `profile`
    pub fn new(profile: VendorProfile) -> Self {
        Self { profile }
    }

    /// The vendor profile in use
    pub fn profile(&self) -> &VendorProfile {
        &self.profile
    }

    async fn extract_primary_key(
        &self,
        source: &dyn CatalogSource,
        table: &ObjectName,
    ) -> Result<Option<PrimaryKey>> {
        let rows = source
            .primary_keys(table)
            .await
            .map_err(wrap("extract_primary_key", &table.name))?;

        let name = rows.iter().find_map(|row| row.pk_name.clone());
        let ordered: BTreeMap<i16, String> = rows
            .into_iter()
            .map(|row| (row.key_seq, row.column_name))
            .collect();

        Ok(PrimaryKey::builder()
            .name(name)
            .columns(ordered.into_values())
            .build())
    }

    async fn build_table(&self, source: &dyn CatalogSource, table: &ObjectName) -> Result<Table> {
        let columns = self.extract_columns(source, table).await?;
        let primary_key = self.extract_primary_key(source, table).await?;
        let columns = match &primary_key {
            Some(pk) => mark_primary_key(columns, pk),
            None => columns,
        };
        let foreign_keys = self.extract_foreign_keys(source, table).await?;
        let indexes = self.extract_indexes(source, table).await?;
        let triggers = self.table_triggers(source, table).await;
        let comment = self.table_comment(source, table).await;

        Ok(Table::builder(&table.name)
            .columns(columns)
            .primary_key(primary_key)
            .foreign_keys(foreign_keys)
            .indexes(indexes)
            .triggers(triggers)
            .comment(comment)
            .build())
    }

    async fn build_view(&self, source: &dyn CatalogSource, view: &ObjectName) -> Result<View> {
        let columns = self.extract_columns(source, view).await?;
        let definition = self.view_definition(source, view).await;

        Ok(View::builder(&view.name)
            .columns(columns)
            .definition(definition)
            .build())
    }

    /// Runs a relation-scoped vendor query, degrading failures to `None`.
    async fn relation_query(
        &self,
        source: &dyn CatalogSource,
        sql: Option<&str>,
        object: &ObjectName,
        what: &str,
    ) -> Option<Vec<QueryRow>> {
        let sql = sql?;
        let scope = object.scope().unwrap_or_default();
        match source.query(sql, &[scope, object.name.as_str()]).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                debug!("Could not read {} for {}: {}", what, object, e);
                None
            }
        }
    }

    async fn table_comment(&self, source: &dyn CatalogSource, table: &ObjectName) -> Option<String> {
        let sql = self.profile.queries().table_comment.as_deref();
        self.relation_query(source, sql, table, "table comment")
            .await?
            .first()
            .and_then(|row| non_empty(row.text("comment")))
    }

    async fn view_definition(&self, source: &dyn CatalogSource, view: &ObjectName) -> Option<String> {
        let sql = self.profile.queries().view_definition.as_deref();
        self.relation_query(source, sql, view, "view definition")
            .await?
            .first()
            .and_then(|row| non_empty(row.text("definition")))
    }

    async fn table_triggers(&self, source: &dyn CatalogSource, table: &ObjectName) -> Vec<Trigger> {
        let sql = self.profile.queries().table_triggers.as_deref();
        self.relation_query(source, sql, table, "triggers")
            .await
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| trigger_from_row(row, &table.name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fills comments the portable rows left empty from the vendor comment
    /// query. Existing comments are never overwritten.
    async fn enhance_column_comments(
        &self,
        source: &dyn CatalogSource,
        relation: &ObjectName,
        columns: Vec<Column>,
    ) -> Vec<Column> {
        let sql = self.profile.queries().column_comments.as_deref();
        let Some(rows) = self
            .relation_query(source, sql, relation, "column comments")
            .await
        else {
            return columns;
        };

        let comments: HashMap<String, String> = rows
            .iter()
            .filter_map(|row| Some((row.text("column_name")?, non_empty(row.text("comment"))?)))
            .collect();
        if comments.is_empty() {
            return columns;
        }

        columns
            .into_iter()
            .map(|column| match comments.get(column.name()) {
                Some(comment) if !column.has_comment() => {
                    column.to_builder().comment(Some(comment.clone())).build()
                }
                _ => column,
            })
            .collect()
    }

    async fn vendor_procedures(
        &self,
        source: &dyn CatalogSource,
        sql: &str,
        scope: &str,
    ) -> Result<Vec<Procedure>> {
        let rows = source.query(sql, &[scope]).await?;
        let mut procedures = Vec::with_capacity(rows.len());

        for row in &rows {
            let Some(name) = non_empty(row.text("name")) else {
                continue;
            };
            let kind = match row.text("type") {
                Some(t) if t.trim().eq_ignore_ascii_case("FUNCTION") => ProcedureKind::Function,
                _ => ProcedureKind::Procedure,
            };
            let return_type = match kind {
                ProcedureKind::Function => non_empty(row.text("return_type")),
                ProcedureKind::Procedure => None,
            };
            let parameters = self.vendor_parameters(source, scope, &name).await;

            procedures.push(
                Procedure::builder(name)
                    .kind(kind)
                    .return_type(return_type)
                    .definition(non_empty(row.text("definition")))
                    .comment(non_empty(row.text("comment")))
                    .parameters(parameters)
                    .build(),
            );
        }

        Ok(procedures)
    }

    async fn vendor_parameters(
        &self,
        source: &dyn CatalogSource,
        scope: &str,
        routine: &str,
    ) -> Vec<Parameter> {
        let Some(sql) = self.profile.queries().procedure_parameters.as_deref() else {
            return Vec::new();
        };
        match source.query(sql, &[scope, routine]).await {
            Ok(rows) => rows.iter().filter_map(parameter_from_row).collect(),
            Err(e) => {
                debug!("Could not read parameters of {}.{}: {}", scope, routine, e);
                Vec::new()
            }
        }
    }

    async fn standard_procedures(
        &self,
        source: &dyn CatalogSource,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> Result<Vec<Procedure>> {
        let scope = schema.or(catalog).unwrap_or_default();
        let rows = source
            .procedures(catalog, schema)
            .await
            .map_err(wrap("extract_procedures", scope))?;

        let mut procedures = Vec::with_capacity(rows.len());
        for row in rows {
            let routine = ObjectName::new(catalog, schema, &row.procedure_name);
            let parameters = match source.procedure_columns(&routine).await {
                Ok(columns) => columns
                    .into_iter()
                    .map(|column| Parameter {
                        name: column.column_name.unwrap_or_default(),
                        data_type: column.type_name,
                        mode: ParameterMode::from_kind_code(column.column_type),
                        position: u32::try_from(column.ordinal_position).unwrap_or(0),
                    })
                    .collect(),
                Err(e) => {
                    debug!("Could not read parameters of {}: {}", routine, e);
                    Vec::new()
                }
            };

            let kind = if row.procedure_type == codes::PROCEDURE_RETURNS_RESULT {
                ProcedureKind::Function
            } else {
                ProcedureKind::Procedure
            };

            procedures.push(
                Procedure::builder(row.procedure_name)
                    .kind(kind)
                    .comment(non_empty(row.remarks))
                    .parameters(parameters)
                    .build(),
            );
        }

        Ok(procedures)
    }
}

#[async_trait]
impl MetadataStrategy for CatalogStrategy {
    fn supports(&self, product_name: &str) -> bool {
        self.profile.matches(product_name)
    }

    fn vendor_name(&self) -> &str {
        self.profile.name()
    }

    fn is_fallback(&self) -> bool {
        self.profile.is_fallback()
    }

    async fn explore(&self, source: &dyn CatalogSource) -> Result<Database> {
        let info = source
            .product_info()
            .await
            .map_err(wrap("explore", "database"))?;
        info!(
            vendor = self.vendor_name(),
            product = %info.product_name,
            version = %info.product_version,
            "Exploring database"
        );

        let mut warnings = Warnings::new();
        let mut builder = Database::builder()
            .product_name(info.product_name)
            .product_version(info.product_version)
            .driver_name(info.driver_name)
            .driver_version(info.driver_version)
            .url(info.url)
            .user_name(info.user_name);

        for schema_name in self.list_schemas(source).await? {
            match self.extract_schema(source, &schema_name, &mut warnings).await {
                Ok(schema) => builder.push_schema(schema),
                Err(e) if e.is_permission_error() => {
                    warnings.push(format!("Permission denied for schema: {schema_name}"));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(builder.warnings(warnings.into_vec()).build())
    }

    async fn list_schemas(&self, source: &dyn CatalogSource) -> Result<Vec<String>> {
        let mut names: Vec<String> = match self.profile.schema_model() {
            SchemaModel::Catalogs => Vec::new(),
            SchemaModel::Schemas => source
                .schemas()
                .await
                .map_err(wrap("list_schemas", "database"))?
                .into_iter()
                .map(|row| row.schema_name)
                .filter(|name| self.profile.should_include_schema(name))
                .collect(),
        };

        // Catalog-modelled vendors list databases only; schema vendors fall
        // back to catalogs when no schema survives the filter.
        if names.is_empty() {
            names = source
                .catalogs()
                .await
                .map_err(wrap("list_schemas", "database"))?
                .into_iter()
                .filter(|name| self.profile.should_include_schema(name))
                .collect();
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn extract_schema(
        &self,
        source: &dyn CatalogSource,
        schema_name: &str,
        warnings: &mut Warnings,
    ) -> Result<Schema> {
        let (catalog, schema) = self.profile.qualifiers(schema_name);
        debug!("Extracting schema {}", schema_name);

        let mut builder = Schema::builder(schema_name).catalog(catalog.map(str::to_string));

        let tables = source
            .tables(catalog, schema, TableType::Table)
            .await
            .map_err(wrap("extract_schema", schema_name))?;
        for row in &tables {
            match self.extract_table(source, &row.object_name()).await {
                Ok(table) => builder.push_table(table),
                Err(e) => warnings.push(format!("Failed to extract table {}: {}", row.name, e)),
            }
        }

        let views = source
            .tables(catalog, schema, TableType::View)
            .await
            .map_err(wrap("extract_schema", schema_name))?;
        for row in &views {
            match self.extract_view(source, &row.object_name()).await {
                Ok(view) => builder.push_view(view),
                Err(e) => warnings.push(format!("Failed to extract view {}: {}", row.name, e)),
            }
        }

        match self.extract_procedures(source, catalog, schema, warnings).await {
            Ok(procedures) => builder = builder.procedures(procedures),
            Err(e) => warnings.push(format!(
                "Failed to extract procedures for schema {schema_name}: {e}"
            )),
        }

        Ok(builder.build())
    }

    async fn extract_table(&self, source: &dyn CatalogSource, table: &ObjectName) -> Result<Table> {
        self.build_table(source, table)
            .await
            .map_err(wrap("extract_table", &table.name))
    }

    async fn extract_columns(
        &self,
        source: &dyn CatalogSource,
        relation: &ObjectName,
    ) -> Result<Vec<Column>> {
        let rows = source
            .columns(relation)
            .await
            .map_err(wrap("extract_columns", &relation.name))?;

        let mut columns: Vec<Column> = rows.into_iter().map(column_from_row).collect();
        columns.sort_by_key(Column::ordinal_position);

        Ok(self.enhance_column_comments(source, relation, columns).await)
    }

    async fn extract_foreign_keys(
        &self,
        source: &dyn CatalogSource,
        table: &ObjectName,
    ) -> Result<Vec<ForeignKey>> {
        let rows = source
            .imported_keys(table)
            .await
            .map_err(wrap("extract_foreign_keys", &table.name))?;

        let mut grouped: Vec<(String, ForeignKeyBuilder)> = Vec::new();
        for row in rows {
            let name = row
                .fk_name
                .unwrap_or_else(|| format!("FK_{}_{}", table.name, row.fk_column_name));

            if let Some((_, builder)) = grouped.iter_mut().find(|(existing, _)| *existing == name) {
                builder.push_pair(row.fk_column_name, row.pk_column_name);
                continue;
            }
            let builder = ForeignKey::builder(&name)
                .referenced_schema(row.pk_table_schema)
                .referenced_table(row.pk_table_name)
                .on_update(ForeignKeyAction::from_rule_code(row.update_rule))
                .on_delete(ForeignKeyAction::from_rule_code(row.delete_rule))
                .column_pair(row.fk_column_name, row.pk_column_name);
            grouped.push((name, builder));
        }

        Ok(grouped
            .into_iter()
            .map(|(_, builder)| builder.build())
            .collect())
    }

    async fn extract_indexes(
        &self,
        source: &dyn CatalogSource,
        table: &ObjectName,
    ) -> Result<Vec<Index>> {
        let rows = source
            .index_info(table)
            .await
            .map_err(wrap("extract_indexes", &table.name))?;

        let mut grouped: Vec<(String, IndexBuilder)> = Vec::new();
        for row in rows {
            let Some(name) = row.index_name else {
                continue;
            };

            let sort_order = SortOrder::from_marker(row.asc_or_desc.as_deref());
            let position = u32::try_from(row.ordinal_position).unwrap_or(0);

            if let Some((_, builder)) = grouped.iter_mut().find(|(existing, _)| *existing == name) {
                if let Some(column) = row.column_name {
                    builder.push_column(column, sort_order, position);
                }
                continue;
            }

            let mut builder = Index::builder(&name)
                .unique(!row.non_unique)
                .index_type(IndexType::from_type_code(row.index_type))
                .filter_condition(row.filter_condition);
            if let Some(column) = row.column_name {
                builder.push_column(column, sort_order, position);
            }
            grouped.push((name, builder));
        }

        Ok(grouped
            .into_iter()
            .map(|(_, builder)| builder.build())
            .collect())
    }

    async fn extract_triggers(
        &self,
        source: &dyn CatalogSource,
        catalog: Option<&str>,
        schema: Option<&str>,
        warnings: &mut Warnings,
    ) -> Result<Vec<Trigger>> {
        let Some(sql) = self.profile.queries().schema_triggers.as_deref() else {
            return Ok(Vec::new());
        };
        let scope = schema.or(catalog).unwrap_or_default();

        match source.query(sql, &[scope]).await {
            Ok(rows) => Ok(rows
                .iter()
                .filter_map(|row| trigger_from_row(row, ""))
                .collect()),
            Err(e) => {
                warnings.push(format!("Failed to extract triggers for schema {scope}: {e}"));
                Ok(Vec::new())
            }
        }
    }

    async fn extract_procedures(
        &self,
        source: &dyn CatalogSource,
        catalog: Option<&str>,
        schema: Option<&str>,
        warnings: &mut Warnings,
    ) -> Result<Vec<Procedure>> {
        let scope = schema.or(catalog).unwrap_or_default();

        let mut procedures = match self.profile.queries().procedures.as_deref() {
            Some(sql) => match self.vendor_procedures(source, sql, scope).await {
                Ok(procedures) => procedures,
                Err(e) => match self.profile.procedure_failure() {
                    ProcedureFailurePolicy::FallbackToStandard => {
                        debug!("Vendor routine query failed for {}, using standard listing: {}", scope, e);
                        self.standard_procedures(source, catalog, schema).await?
                    }
                    ProcedureFailurePolicy::Warn => {
                        warnings.push(format!(
                            "Failed to extract procedures for schema {scope}: {e}"
                        ));
                        Vec::new()
                    }
                },
            },
            None => self.standard_procedures(source, catalog, schema).await?,
        };

        procedures.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(procedures)
    }

    async fn extract_view(&self, source: &dyn CatalogSource, view: &ObjectName) -> Result<View> {
        self.build_view(source, view)
            .await
            .map_err(wrap("extract_view", &view.name))
    }
}

fn wrap(operation: &'static str, object: &str) -> impl FnOnce(MetadataError) -> MetadataError {
    let object = object.to_string();
    move |e| MetadataError::extraction(operation, object, e)
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

fn is_yes(flag: Option<&str>) -> bool {
    flag.is_some_and(|f| f.eq_ignore_ascii_case("YES"))
}

fn column_from_row(row: ColumnRow) -> Column {
    let size = row.column_size.unwrap_or(0);
    Column::builder(row.column_name)
        .data_type(row.type_name)
        .size(size)
        .precision(size)
        .scale(row.decimal_digits.unwrap_or(0))
        .nullable(is_yes(row.is_nullable.as_deref()))
        .auto_increment(is_yes(row.is_autoincrement.as_deref()))
        .default_value(row.column_default)
        .comment(non_empty(row.remarks))
        .ordinal_position(u32::try_from(row.ordinal_position).unwrap_or(0))
        .build()
}

fn mark_primary_key(columns: Vec<Column>, primary_key: &PrimaryKey) -> Vec<Column> {
    let key_columns: HashSet<&str> = primary_key.columns().iter().map(String::as_str).collect();
    columns
        .into_iter()
        .map(|column| {
            if key_columns.contains(column.name()) {
                column.to_builder().primary_key(true).build()
            } else {
                column
            }
        })
        .collect()
}

/// Trigger from a vendor row; `table` is used when the row names none.
fn trigger_from_row(row: &QueryRow, table: &str) -> Option<Trigger> {
    let name = non_empty(row.text("trigger_name"))?;
    let table_name = non_empty(row.text("table_name")).unwrap_or_else(|| table.to_string());

    Some(
        Trigger::builder(name, table_name)
            .timing(row.text("timing").map_or(TriggerTiming::default(), |t| TriggerTiming::parse(&t)))
            .event(row.text("event").map_or(TriggerEvent::default(), |e| TriggerEvent::parse(&e)))
            .enabled(row.flag("enabled").unwrap_or(true))
            .definition(non_empty(row.text("definition")))
            .build(),
    )
}

/// Parameter from a vendor row. Unnamed entries (return slots) are
/// skipped and the `@` sigil is stripped.
fn parameter_from_row(row: &QueryRow) -> Option<Parameter> {
    let raw = row.text("parameter_name")?;
    let name = raw.trim().trim_start_matches('@');
    if name.is_empty() {
        return None;
    }

    Some(Parameter {
        name: name.to_string(),
        data_type: non_empty(row.text("data_type")),
        mode: row.text("mode").map_or(ParameterMode::In, |m| ParameterMode::parse(&m)),
        position: row
            .int("position")
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_row_maps_portable_fields() {
        let mut row = ColumnRow::new("amount", "numeric", 3);
        row.column_size = Some(12);
        row.decimal_digits = None;
        row.is_nullable = Some("no".to_string());
        row.is_autoincrement = Some("yes".to_string());
        row.remarks = Some(String::new());

        let column = column_from_row(row);
        assert_eq!(column.size(), 12);
        assert_eq!(column.precision(), 12);
        assert_eq!(column.scale(), 0);
        assert!(!column.is_nullable());
        assert!(column.is_auto_increment());
        assert_eq!(column.comment(), None);
        assert_eq!(column.ordinal_position(), 3);
    }

    #[test]
    fn test_parameter_from_row_strips_sigil_and_skips_unnamed() {
        let named = QueryRow::new()
            .with("parameter_name", "@customer_id")
            .with("data_type", "int")
            .with("mode", "OUT")
            .with("position", 1_i64);
        let unnamed = QueryRow::new()
            .with("parameter_name", "")
            .with("mode", "RETURN");

        let param = parameter_from_row(&named).unwrap();
        assert_eq!(param.name, "customer_id");
        assert_eq!(param.mode, ParameterMode::Out);
        assert_eq!(param.position, 1);
        assert!(parameter_from_row(&unnamed).is_none());
    }

    #[test]
    fn test_trigger_from_row_defaults() {
        let row = QueryRow::new()
            .with("trigger_name", "audit_orders")
            .with("timing", "BEFORE")
            .with("event", "UPDATE");

        let trigger = trigger_from_row(&row, "orders").unwrap();
        assert_eq!(trigger.table_name(), "orders");
        assert_eq!(trigger.timing(), TriggerTiming::Before);
        assert_eq!(trigger.event(), TriggerEvent::Update);
        assert!(trigger.is_enabled());
        assert!(trigger_from_row(&QueryRow::new(), "orders").is_none());
    }
}
