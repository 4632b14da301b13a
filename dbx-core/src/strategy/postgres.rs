//! PostgreSQL profile: `pg_catalog` comments, triggers and routines.

use super::profile::{NameCase, ProcedureFailurePolicy, SchemaModel, VendorProfile, VendorQueries};

const TABLE_COMMENT: &str = "\
SELECT obj_description(c.oid, 'pg_class')::text AS comment
FROM pg_class c
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1 AND c.relname = $2";

const COLUMN_COMMENTS: &str = "\
SELECT a.attname::text AS column_name,
       col_description(c.oid, a.attnum)::text AS comment
FROM pg_attribute a
JOIN pg_class c ON c.oid = a.attrelid
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relname = $2
  AND a.attnum > 0
  AND NOT a.attisdropped
  AND col_description(c.oid, a.attnum) IS NOT NULL";

const VIEW_DEFINITION: &str = "\
SELECT definition::text AS definition
FROM pg_views
WHERE schemaname = $1 AND viewname = $2";

const TRIGGER_COLUMNS: &str = "\
SELECT t.tgname::text AS trigger_name,
       c.relname::text AS table_name,
       CASE
           WHEN t.tgtype & 2 = 2 THEN 'BEFORE'
           WHEN t.tgtype & 64 = 64 THEN 'INSTEAD_OF'
           ELSE 'AFTER'
       END AS timing,
       CASE
           WHEN t.tgtype & 4 = 4 THEN 'INSERT'
           WHEN t.tgtype & 8 = 8 THEN 'DELETE'
           WHEN t.tgtype & 16 = 16 THEN 'UPDATE'
           WHEN t.tgtype & 32 = 32 THEN 'TRUNCATE'
           ELSE 'UPDATE'
       END AS event,
       t.tgenabled <> 'D' AS enabled,
       pg_get_triggerdef(t.oid)::text AS definition
FROM pg_trigger t
JOIN pg_class c ON c.oid = t.tgrelid
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE NOT t.tgisinternal
  AND n.nspname = $1";

const PROCEDURES: &str = "\
SELECT p.proname::text AS name,
       CASE WHEN p.prokind = 'p' THEN 'PROCEDURE' ELSE 'FUNCTION' END AS type,
       pg_get_function_result(p.oid)::text AS return_type,
       pg_get_functiondef(p.oid)::text AS definition,
       d.description::text AS comment
FROM pg_proc p
JOIN pg_namespace n ON n.oid = p.pronamespace
LEFT JOIN pg_description d ON d.objoid = p.oid AND d.classoid = 'pg_proc'::regclass
WHERE n.nspname = $1
  AND p.prokind IN ('f', 'p')
ORDER BY p.proname";

const PROCEDURE_PARAMETERS: &str = "\
SELECT p.parameter_name::text AS parameter_name,
       p.udt_name::text AS data_type,
       p.parameter_mode::text AS mode,
       p.ordinal_position::int4 AS position
FROM information_schema.parameters p
JOIN information_schema.routines r ON r.specific_schema = p.specific_schema
                                  AND r.specific_name = p.specific_name
WHERE r.routine_schema = $1 AND r.routine_name = $2
ORDER BY p.ordinal_position";

/// Profile for PostgreSQL servers.
///
/// Routine extraction falls back to the portable listing when the
/// `pg_proc` query is refused.
pub fn postgres_profile() -> VendorProfile {
    VendorProfile::new("PostgreSQL")
        .with_needles(["postgresql"])
        .with_system_schemas(
            [
                "pg_catalog",
                "information_schema",
                "pg_toast",
                "pg_temp_1",
                "pg_toast_temp_1",
            ],
            NameCase::Insensitive,
        )
        .with_system_prefix("pg_")
        .with_schema_model(SchemaModel::Schemas)
        .with_queries(VendorQueries {
            table_comment: Some(TABLE_COMMENT.into()),
            column_comments: Some(COLUMN_COMMENTS.into()),
            view_definition: Some(VIEW_DEFINITION.into()),
            schema_triggers: Some(format!("{TRIGGER_COLUMNS}\nORDER BY c.relname, t.tgname").into()),
            table_triggers: Some(
                format!("{TRIGGER_COLUMNS}\n  AND c.relname = $2\nORDER BY t.tgname").into(),
            ),
            procedures: Some(PROCEDURES.into()),
            procedure_parameters: Some(PROCEDURE_PARAMETERS.into()),
        })
        .with_procedure_failure(ProcedureFailurePolicy::FallbackToStandard)
}
