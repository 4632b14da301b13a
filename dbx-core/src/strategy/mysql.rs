//! MySQL and MariaDB profile. Each database (catalog) is reported as a
//! schema.

use super::profile::{NameCase, ProcedureFailurePolicy, SchemaModel, VendorProfile, VendorQueries};

const TABLE_COMMENT: &str = "\
SELECT CAST(TABLE_COMMENT AS CHAR) AS comment
FROM information_schema.TABLES
WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?";

const COLUMN_COMMENTS: &str = "\
SELECT CAST(COLUMN_NAME AS CHAR) AS column_name,
       CAST(COLUMN_COMMENT AS CHAR) AS comment
FROM information_schema.COLUMNS
WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND COLUMN_COMMENT <> ''";

const VIEW_DEFINITION: &str = "\
SELECT CAST(VIEW_DEFINITION AS CHAR) AS definition
FROM information_schema.VIEWS
WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?";

const SCHEMA_TRIGGERS: &str = "\
SELECT CAST(TRIGGER_NAME AS CHAR) AS trigger_name,
       CAST(EVENT_OBJECT_TABLE AS CHAR) AS table_name,
       CAST(ACTION_TIMING AS CHAR) AS timing,
       CAST(EVENT_MANIPULATION AS CHAR) AS event,
       CAST(ACTION_STATEMENT AS CHAR) AS definition
FROM information_schema.TRIGGERS
WHERE TRIGGER_SCHEMA = ?
ORDER BY EVENT_OBJECT_TABLE, TRIGGER_NAME";

const TABLE_TRIGGERS: &str = "\
SELECT CAST(TRIGGER_NAME AS CHAR) AS trigger_name,
       CAST(EVENT_OBJECT_TABLE AS CHAR) AS table_name,
       CAST(ACTION_TIMING AS CHAR) AS timing,
       CAST(EVENT_MANIPULATION AS CHAR) AS event,
       CAST(ACTION_STATEMENT AS CHAR) AS definition
FROM information_schema.TRIGGERS
WHERE TRIGGER_SCHEMA = ? AND EVENT_OBJECT_TABLE = ?
ORDER BY TRIGGER_NAME";

const PROCEDURES: &str = "\
SELECT CAST(ROUTINE_NAME AS CHAR) AS name,
       CAST(ROUTINE_TYPE AS CHAR) AS type,
       CAST(DTD_IDENTIFIER AS CHAR) AS return_type,
       CAST(ROUTINE_DEFINITION AS CHAR) AS definition,
       CAST(ROUTINE_COMMENT AS CHAR) AS comment
FROM information_schema.ROUTINES
WHERE ROUTINE_SCHEMA = ?
ORDER BY ROUTINE_NAME";

const PROCEDURE_PARAMETERS: &str = "\
SELECT CAST(PARAMETER_NAME AS CHAR) AS parameter_name,
       CAST(DATA_TYPE AS CHAR) AS data_type,
       CAST(PARAMETER_MODE AS CHAR) AS mode,
       CAST(ORDINAL_POSITION AS SIGNED) AS position
FROM information_schema.PARAMETERS
WHERE SPECIFIC_SCHEMA = ? AND SPECIFIC_NAME = ?
ORDER BY ORDINAL_POSITION";

/// Profile for MySQL and MariaDB servers.
///
/// Triggers are always reported enabled; MySQL has no disabled state.
pub fn mysql_profile() -> VendorProfile {
    VendorProfile::new("MySQL")
        .with_needles(["mysql", "mariadb"])
        .with_system_schemas(
            ["information_schema", "mysql", "performance_schema", "sys"],
            NameCase::Insensitive,
        )
        .with_schema_model(SchemaModel::Catalogs)
        .with_queries(VendorQueries {
            table_comment: Some(TABLE_COMMENT.into()),
            column_comments: Some(COLUMN_COMMENTS.into()),
            view_definition: Some(VIEW_DEFINITION.into()),
            schema_triggers: Some(SCHEMA_TRIGGERS.into()),
            table_triggers: Some(TABLE_TRIGGERS.into()),
            procedures: Some(PROCEDURES.into()),
            procedure_parameters: Some(PROCEDURE_PARAMETERS.into()),
        })
        .with_procedure_failure(ProcedureFailurePolicy::Warn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_mysql_and_mariadb() {
        let profile = mysql_profile();
        assert!(profile.matches("MySQL"));
        assert!(profile.matches("MariaDB"));
        assert!(!profile.matches("PostgreSQL 16.2"));
    }

    #[test]
    fn test_filters_system_databases() {
        let profile = mysql_profile();
        for system in ["information_schema", "MYSQL", "performance_schema", "sys"] {
            assert!(!profile.should_include_schema(system), "{system}");
        }
        assert!(profile.should_include_schema("shop"));
        assert_eq!(profile.schema_model(), SchemaModel::Catalogs);
    }
}
