//! SQL Server profile. Comments come from `MS_Description` extended
//! properties.

use super::profile::{NameCase, ProcedureFailurePolicy, SchemaModel, VendorProfile, VendorQueries};

const TABLE_COMMENT: &str = "\
SELECT CAST(ep.value AS NVARCHAR(4000)) AS comment
FROM sys.extended_properties ep
JOIN sys.tables t ON ep.major_id = t.object_id
JOIN sys.schemas s ON t.schema_id = s.schema_id
WHERE ep.minor_id = 0
  AND ep.name = 'MS_Description'
  AND s.name = ?
  AND t.name = ?";

const COLUMN_COMMENTS: &str = "\
SELECT c.name AS column_name,
       CAST(ep.value AS NVARCHAR(4000)) AS comment
FROM sys.extended_properties ep
JOIN sys.columns c ON ep.major_id = c.object_id AND ep.minor_id = c.column_id
JOIN sys.objects o ON c.object_id = o.object_id
JOIN sys.schemas s ON o.schema_id = s.schema_id
WHERE ep.name = 'MS_Description'
  AND s.name = ?
  AND o.name = ?";

const VIEW_DEFINITION: &str = "\
SELECT OBJECT_DEFINITION(OBJECT_ID(QUOTENAME(?) + '.' + QUOTENAME(?))) AS definition";

const TRIGGER_COLUMNS: &str = "\
SELECT tr.name AS trigger_name,
       o.name AS table_name,
       CASE WHEN tr.is_instead_of_trigger = 1 THEN 'INSTEAD_OF' ELSE 'AFTER' END AS timing,
       te.type_desc AS event,
       CASE WHEN tr.is_disabled = 1 THEN 0 ELSE 1 END AS enabled,
       OBJECT_DEFINITION(tr.object_id) AS definition
FROM sys.triggers tr
JOIN sys.trigger_events te ON tr.object_id = te.object_id
JOIN sys.objects o ON tr.parent_id = o.object_id
JOIN sys.schemas s ON o.schema_id = s.schema_id
WHERE s.name = ?";

const PROCEDURES: &str = "\
SELECT o.name AS name,
       CASE WHEN o.type = 'P' THEN 'PROCEDURE' ELSE 'FUNCTION' END AS type,
       CASE WHEN o.type = 'FN' THEN TYPE_NAME(r.user_type_id) END AS return_type,
       OBJECT_DEFINITION(o.object_id) AS definition,
       CAST(ep.value AS NVARCHAR(4000)) AS comment
FROM sys.objects o
JOIN sys.schemas s ON o.schema_id = s.schema_id
LEFT JOIN sys.parameters r ON r.object_id = o.object_id AND r.parameter_id = 0
LEFT JOIN sys.extended_properties ep ON ep.major_id = o.object_id
                                    AND ep.minor_id = 0
                                    AND ep.name = 'MS_Description'
WHERE o.type IN ('P', 'FN', 'IF', 'TF')
  AND s.name = ?
ORDER BY o.name";

const PROCEDURE_PARAMETERS: &str = "\
SELECT p.name AS parameter_name,
       TYPE_NAME(p.user_type_id) AS data_type,
       CASE
           WHEN p.is_output = 1 THEN 'OUT'
           WHEN p.parameter_id = 0 THEN 'RETURN'
           ELSE 'IN'
       END AS mode,
       p.parameter_id AS position
FROM sys.parameters p
JOIN sys.objects o ON p.object_id = o.object_id
JOIN sys.schemas s ON o.schema_id = s.schema_id
WHERE s.name = ? AND o.name = ?
ORDER BY p.parameter_id";

/// Profile for Microsoft SQL Server.
///
/// Schema names are compared case-sensitively: the fixed database roles
/// and `INFORMATION_SCHEMA` are filtered only in their canonical spelling.
pub fn mssql_profile() -> VendorProfile {
    VendorProfile::new("MSSQL")
        .with_needles(["sql server"])
        .with_system_schemas(
            [
                "db_accessadmin",
                "db_backupoperator",
                "db_datareader",
                "db_datawriter",
                "db_ddladmin",
                "db_denydatareader",
                "db_denydatawriter",
                "db_owner",
                "db_securityadmin",
                "guest",
                "INFORMATION_SCHEMA",
                "sys",
            ],
            NameCase::Sensitive,
        )
        .with_schema_model(SchemaModel::Schemas)
        .with_queries(VendorQueries {
            table_comment: Some(TABLE_COMMENT.into()),
            column_comments: Some(COLUMN_COMMENTS.into()),
            view_definition: Some(VIEW_DEFINITION.into()),
            schema_triggers: Some(format!("{TRIGGER_COLUMNS}\nORDER BY o.name, tr.name").into()),
            table_triggers: Some(format!("{TRIGGER_COLUMNS}\n  AND o.name = ?\nORDER BY tr.name").into()),
            procedures: Some(PROCEDURES.into()),
            procedure_parameters: Some(PROCEDURE_PARAMETERS.into()),
        })
        .with_procedure_failure(ProcedureFailurePolicy::Warn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_sql_server_product_name() {
        let profile = mssql_profile();
        assert!(profile.matches("Microsoft SQL Server 2019"));
        assert!(!profile.matches("MySQL"));
    }

    #[test]
    fn test_system_schema_filter_is_case_sensitive() {
        let profile = mssql_profile();
        assert!(!profile.should_include_schema("INFORMATION_SCHEMA"));
        assert!(!profile.should_include_schema("db_owner"));
        assert!(profile.should_include_schema("information_schema"));
        assert!(profile.should_include_schema("dbo"));
    }
}
