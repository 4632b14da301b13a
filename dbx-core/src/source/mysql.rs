//! MySQL/MariaDB catalog source backed by a `sqlx` connection pool.
//!
//! MySQL has no schema level below the database, so databases are
//! reported as catalogs and [`CatalogSource::schemas`] is always empty.
//! Text columns are `CAST(... AS CHAR)` so they decode as `String`
//! regardless of the server's binary collation handling.

use super::{
    CatalogSource, ColumnRow, ImportedKeyRow, IndexInfoRow, ObjectName, PrimaryKeyRow,
    ProcedureColumnRow, ProcedureRow, ProductInfo, QueryRow, SchemaRow, SqlValue, TableRow, codes,
};
use crate::config::ConnectionConfig;
use crate::error::{MetadataError, Result, redact_database_url};
use crate::models::TableType;
use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row};
use url::Url;

const CATALOGS_SQL: &str = r"
    SELECT CAST(SCHEMA_NAME AS CHAR) AS name
    FROM information_schema.SCHEMATA
    ORDER BY SCHEMA_NAME";

const TABLES_SQL: &str = r"
    SELECT CAST(TABLE_SCHEMA AS CHAR) AS table_catalog,
           CAST(TABLE_NAME AS CHAR) AS table_name,
           CAST(NULLIF(TABLE_COMMENT, '') AS CHAR) AS remarks
    FROM information_schema.TABLES
    WHERE TABLE_TYPE = ?
      AND (? IS NULL OR TABLE_SCHEMA = ?)
    ORDER BY TABLE_SCHEMA, TABLE_NAME";

const COLUMNS_SQL: &str = r"
    SELECT CAST(COLUMN_NAME AS CHAR) AS column_name,
           CAST(UPPER(DATA_TYPE) AS CHAR) AS type_name,
           CAST(COALESCE(CHARACTER_MAXIMUM_LENGTH, NUMERIC_PRECISION, DATETIME_PRECISION) AS SIGNED) AS column_size,
           CAST(NUMERIC_SCALE AS SIGNED) AS decimal_digits,
           CAST(IS_NULLABLE AS CHAR) AS is_nullable,
           CAST(ORDINAL_POSITION AS SIGNED) AS ordinal_position,
           CAST(COLUMN_DEFAULT AS CHAR) AS column_default,
           CAST(IF(EXTRA LIKE '%auto_increment%', 'YES', 'NO') AS CHAR) AS is_autoincrement,
           CAST(NULLIF(COLUMN_COMMENT, '') AS CHAR) AS remarks
    FROM information_schema.COLUMNS
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
    ORDER BY ORDINAL_POSITION";

const PRIMARY_KEYS_SQL: &str = r"
    SELECT CAST(CONSTRAINT_NAME AS CHAR) AS pk_name,
           CAST(COLUMN_NAME AS CHAR) AS column_name,
           CAST(ORDINAL_POSITION AS SIGNED) AS key_seq
    FROM information_schema.KEY_COLUMN_USAGE
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND CONSTRAINT_NAME = 'PRIMARY'
    ORDER BY COLUMN_NAME";

const IMPORTED_KEYS_SQL: &str = r"
    SELECT CAST(k.CONSTRAINT_NAME AS CHAR) AS fk_name,
           CAST(k.COLUMN_NAME AS CHAR) AS fk_column_name,
           CAST(k.REFERENCED_TABLE_SCHEMA AS CHAR) AS pk_table_schema,
           CAST(k.REFERENCED_TABLE_NAME AS CHAR) AS pk_table_name,
           CAST(k.REFERENCED_COLUMN_NAME AS CHAR) AS pk_column_name,
           CAST(k.ORDINAL_POSITION AS SIGNED) AS key_seq,
           CAST(r.UPDATE_RULE AS CHAR) AS update_rule,
           CAST(r.DELETE_RULE AS CHAR) AS delete_rule
    FROM information_schema.KEY_COLUMN_USAGE k
    JOIN information_schema.REFERENTIAL_CONSTRAINTS r
      ON r.CONSTRAINT_SCHEMA = k.CONSTRAINT_SCHEMA
     AND r.CONSTRAINT_NAME = k.CONSTRAINT_NAME
     AND r.TABLE_NAME = k.TABLE_NAME
    WHERE k.TABLE_SCHEMA = ? AND k.TABLE_NAME = ?
      AND k.REFERENCED_TABLE_NAME IS NOT NULL
    ORDER BY k.REFERENCED_TABLE_SCHEMA, k.REFERENCED_TABLE_NAME, k.CONSTRAINT_NAME, k.ORDINAL_POSITION";

const INDEX_INFO_SQL: &str = r"
    SELECT CAST(INDEX_NAME AS CHAR) AS index_name,
           CAST(NON_UNIQUE AS SIGNED) AS non_unique,
           CAST(INDEX_TYPE AS CHAR) AS index_type,
           CAST(COLUMN_NAME AS CHAR) AS column_name,
           CAST(COLLATION AS CHAR) AS asc_or_desc,
           CAST(SEQ_IN_INDEX AS SIGNED) AS ordinal_position
    FROM information_schema.STATISTICS
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
    ORDER BY NON_UNIQUE, INDEX_NAME, SEQ_IN_INDEX";

const PROCEDURES_SQL: &str = r"
    SELECT CAST(ROUTINE_NAME AS CHAR) AS procedure_name,
           CAST(ROUTINE_TYPE AS CHAR) AS routine_type,
           CAST(NULLIF(ROUTINE_COMMENT, '') AS CHAR) AS remarks
    FROM information_schema.ROUTINES
    WHERE (? IS NULL OR ROUTINE_SCHEMA = ?)
    ORDER BY ROUTINE_NAME";

const PROCEDURE_COLUMNS_SQL: &str = r"
    SELECT CAST(PARAMETER_NAME AS CHAR) AS column_name,
           CAST(UPPER(DATA_TYPE) AS CHAR) AS type_name,
           CAST(PARAMETER_MODE AS CHAR) AS parameter_mode,
           CAST(ORDINAL_POSITION AS SIGNED) AS ordinal_position
    FROM information_schema.PARAMETERS
    WHERE SPECIFIC_SCHEMA = ? AND SPECIFIC_NAME = ?
    ORDER BY ORDINAL_POSITION";

/// MySQL/MariaDB catalog source with connection pooling.
pub struct MySqlSource {
    pool: MySqlPool,
    config: ConnectionConfig,
    redacted_url: String,
}

impl std::fmt::Debug for MySqlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSource")
            .field("config", &self.config)
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

impl MySqlSource {
    /// Creates a source with a lazily connecting pool.
    ///
    /// # Errors
    /// Returns error if the connection string is malformed.
    pub fn new(connection_string: &str) -> Result<Self> {
        Self::validate_connection_string(connection_string)?;
        let config = ConnectionConfig::from_url(connection_string)?;
        Self::with_config(connection_string, config)
    }

    /// # Errors
    /// Returns error if the configuration or connection string is invalid.
    pub fn with_config(connection_string: &str, config: ConnectionConfig) -> Result<Self> {
        config.validate()?;
        Self::validate_connection_string(connection_string)?;
        let pool = create_connection_pool(connection_string, &config)?;
        Ok(Self {
            pool,
            config,
            redacted_url: redact_database_url(connection_string),
        })
    }

    /// Pool settings parsed from the connection URL
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Closes the pool; the source is unusable afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// # Errors
    /// Returns a configuration error for a malformed URL, a non-mysql
    /// scheme, or a missing host.
    pub fn validate_connection_string(connection_string: &str) -> Result<()> {
        let url = Url::parse(connection_string).map_err(|e| {
            MetadataError::configuration(format!("Invalid MySQL connection string format: {e}"))
        })?;

        if !matches!(url.scheme(), "mysql" | "mariadb") {
            return Err(MetadataError::configuration(
                "Connection string must use mysql:// scheme",
            ));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(MetadataError::configuration(
                "Connection string must specify a host",
            ));
        }

        Ok(())
    }

    async fn fetch(&self, context: &str, sql: &str, params: &[&str]) -> Result<Vec<MySqlRow>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(*param);
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MetadataError::from_sqlx(context, e))
    }

    async fn fetch_scoped(&self, context: &str, sql: &str, scope: Option<&str>) -> Result<Vec<MySqlRow>> {
        sqlx::query(sql)
            .bind(scope)
            .bind(scope)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MetadataError::from_sqlx(context, e))
    }
}

fn create_connection_pool(connection_string: &str, config: &ConnectionConfig) -> Result<MySqlPool> {
    use sqlx::Executor;

    let query_timeout_ms = config.query_timeout.as_millis();
    let read_only = config.read_only;

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .test_before_acquire(true)
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                conn.execute(format!("SET max_execution_time = {query_timeout_ms}").as_str())
                    .await?;
                if read_only {
                    conn.execute("SET SESSION TRANSACTION READ ONLY").await?;
                }
                conn.execute("SET time_zone = '+00:00'").await?;
                Ok(())
            })
        })
        .connect_lazy(connection_string)
        .map_err(|e| {
            MetadataError::connection_failed(
                format!(
                    "Failed to create MySQL connection pool to {}",
                    redact_database_url(connection_string)
                ),
                e,
            )
        })
}

fn field<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(name)
        .map_err(|e| MetadataError::from_sqlx(format!("decoding {name}"), e))
}

fn narrow_i32(value: Option<i64>) -> Option<i32> {
    value.map(|v| i32::try_from(v).unwrap_or(i32::MAX))
}

fn narrow_i16(value: i64) -> i16 {
    i16::try_from(value).unwrap_or(i16::MAX)
}

fn table_type_text(kind: TableType) -> Option<&'static str> {
    match kind {
        TableType::Table => Some("BASE TABLE"),
        TableType::View => Some("VIEW"),
        TableType::SystemTable => Some("SYSTEM VIEW"),
        TableType::GlobalTemporary
        | TableType::LocalTemporary
        | TableType::Alias
        | TableType::Synonym => None,
    }
}

/// Portable rule code for a referential action keyword.
fn rule_code(rule: Option<&str>) -> i16 {
    match rule.map(str::trim) {
        Some("CASCADE") => codes::IMPORTED_KEY_CASCADE,
        Some("RESTRICT") => codes::IMPORTED_KEY_RESTRICT,
        Some("SET NULL") => codes::IMPORTED_KEY_SET_NULL,
        Some("SET DEFAULT") => codes::IMPORTED_KEY_SET_DEFAULT,
        _ => codes::IMPORTED_KEY_NO_ACTION,
    }
}

fn index_type_code(index_type: Option<&str>) -> i16 {
    match index_type {
        Some("HASH") => codes::TABLE_INDEX_HASHED,
        _ => codes::TABLE_INDEX_OTHER,
    }
}

/// Portable parameter kind; a row without a mode is the function result.
fn parameter_kind_code(mode: Option<&str>) -> i16 {
    match mode {
        Some("IN") => codes::PROCEDURE_COLUMN_IN,
        Some("INOUT") => codes::PROCEDURE_COLUMN_INOUT,
        Some("OUT") => codes::PROCEDURE_COLUMN_OUT,
        None => codes::PROCEDURE_COLUMN_RETURN,
        Some(_) => codes::PROCEDURE_COLUMN_UNKNOWN,
    }
}

fn product_name_for(version: &str) -> &'static str {
    if version.to_ascii_lowercase().contains("mariadb") {
        "MariaDB"
    } else {
        "MySQL"
    }
}

fn dynamic_value(row: &MySqlRow, index: usize) -> SqlValue {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.into();
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.into();
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return v.into();
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return v
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .into();
    }
    SqlValue::Null
}

fn to_query_row(row: &MySqlRow) -> QueryRow {
    let mut out = QueryRow::new();
    for (index, column) in row.columns().iter().enumerate() {
        out.push(column.name(), dynamic_value(row, index));
    }
    out
}

#[async_trait]
impl CatalogSource for MySqlSource {
    async fn product_info(&self) -> Result<ProductInfo> {
        let row = sqlx::query(
            "SELECT CAST(VERSION() AS CHAR) AS version, CAST(CURRENT_USER() AS CHAR) AS user_name",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            MetadataError::connection_failed(
                format!("Cannot read server identity from {}", self.redacted_url),
                e,
            )
        })?;

        let version: String = field(&row, "version")?;
        Ok(ProductInfo {
            product_name: product_name_for(&version).to_string(),
            product_version: version,
            driver_name: "sqlx-mysql".to_string(),
            driver_version: "0.8".to_string(),
            url: Some(self.redacted_url.clone()),
            user_name: field(&row, "user_name")?,
        })
    }

    async fn catalogs(&self) -> Result<Vec<String>> {
        let rows = self.fetch("catalogs", CATALOGS_SQL, &[]).await?;
        rows.iter().map(|r| field(r, "name")).collect()
    }

    async fn schemas(&self) -> Result<Vec<SchemaRow>> {
        Ok(Vec::new())
    }

    async fn tables(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        kind: TableType,
    ) -> Result<Vec<TableRow>> {
        let Some(type_text) = table_type_text(kind) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(TABLES_SQL)
            .bind(type_text)
            .bind(catalog)
            .bind(catalog)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                MetadataError::from_sqlx(format!("{kind} list of {}", catalog.unwrap_or("*")), e)
            })?;

        rows.iter()
            .map(|r| {
                Ok(TableRow {
                    catalog: field(r, "table_catalog")?,
                    schema: None,
                    name: field(r, "table_name")?,
                    kind,
                    remarks: field(r, "remarks")?,
                })
            })
            .collect()
    }

    async fn columns(&self, object: &ObjectName) -> Result<Vec<ColumnRow>> {
        let context = format!("columns of {object}");
        let scope = object.scope().unwrap_or_default();
        let rows = self.fetch(&context, COLUMNS_SQL, &[scope, &object.name]).await?;
        rows.iter()
            .map(|r| {
                let ordinal: i64 = field(r, "ordinal_position")?;
                Ok(ColumnRow {
                    column_name: field(r, "column_name")?,
                    type_name: field(r, "type_name")?,
                    column_size: narrow_i32(field(r, "column_size")?),
                    decimal_digits: narrow_i32(field(r, "decimal_digits")?),
                    is_nullable: field(r, "is_nullable")?,
                    ordinal_position: i32::try_from(ordinal).unwrap_or(i32::MAX),
                    column_default: field(r, "column_default")?,
                    is_autoincrement: field(r, "is_autoincrement")?,
                    remarks: field(r, "remarks")?,
                })
            })
            .collect()
    }

    async fn primary_keys(&self, object: &ObjectName) -> Result<Vec<PrimaryKeyRow>> {
        let context = format!("primary key of {object}");
        let scope = object.scope().unwrap_or_default();
        let rows = self
            .fetch(&context, PRIMARY_KEYS_SQL, &[scope, &object.name])
            .await?;
        rows.iter()
            .map(|r| {
                Ok(PrimaryKeyRow {
                    pk_name: field(r, "pk_name")?,
                    column_name: field(r, "column_name")?,
                    key_seq: narrow_i16(field(r, "key_seq")?),
                })
            })
            .collect()
    }

    async fn imported_keys(&self, object: &ObjectName) -> Result<Vec<ImportedKeyRow>> {
        let context = format!("foreign keys of {object}");
        let scope = object.scope().unwrap_or_default();
        let rows = self
            .fetch(&context, IMPORTED_KEYS_SQL, &[scope, &object.name])
            .await?;
        rows.iter()
            .map(|r| {
                let update_rule: Option<String> = field(r, "update_rule")?;
                let delete_rule: Option<String> = field(r, "delete_rule")?;
                Ok(ImportedKeyRow {
                    fk_name: field(r, "fk_name")?,
                    fk_column_name: field(r, "fk_column_name")?,
                    pk_table_schema: field(r, "pk_table_schema")?,
                    pk_table_name: field(r, "pk_table_name")?,
                    pk_column_name: field(r, "pk_column_name")?,
                    key_seq: narrow_i16(field(r, "key_seq")?),
                    update_rule: rule_code(update_rule.as_deref()),
                    delete_rule: rule_code(delete_rule.as_deref()),
                })
            })
            .collect()
    }

    async fn index_info(&self, object: &ObjectName) -> Result<Vec<IndexInfoRow>> {
        let context = format!("indexes of {object}");
        let scope = object.scope().unwrap_or_default();
        let rows = self
            .fetch(&context, INDEX_INFO_SQL, &[scope, &object.name])
            .await?;
        rows.iter()
            .map(|r| {
                let non_unique: i64 = field(r, "non_unique")?;
                let index_type: Option<String> = field(r, "index_type")?;
                Ok(IndexInfoRow {
                    index_name: field(r, "index_name")?,
                    non_unique: non_unique != 0,
                    index_type: index_type_code(index_type.as_deref()),
                    column_name: field(r, "column_name")?,
                    asc_or_desc: field(r, "asc_or_desc")?,
                    ordinal_position: narrow_i16(field(r, "ordinal_position")?),
                    filter_condition: None,
                })
            })
            .collect()
    }

    async fn procedures(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
    ) -> Result<Vec<ProcedureRow>> {
        let context = format!("routines of {}", catalog.unwrap_or("*"));
        let rows = self.fetch_scoped(&context, PROCEDURES_SQL, catalog).await?;
        rows.iter()
            .map(|r| {
                let routine_type: String = field(r, "routine_type")?;
                Ok(ProcedureRow {
                    procedure_name: field(r, "procedure_name")?,
                    procedure_type: if routine_type.eq_ignore_ascii_case("FUNCTION") {
                        codes::PROCEDURE_RETURNS_RESULT
                    } else {
                        codes::PROCEDURE_NO_RESULT
                    },
                    remarks: field(r, "remarks")?,
                })
            })
            .collect()
    }

    async fn procedure_columns(&self, routine: &ObjectName) -> Result<Vec<ProcedureColumnRow>> {
        let context = format!("parameters of {routine}");
        let scope = routine.scope().unwrap_or_default();
        let rows = self
            .fetch(&context, PROCEDURE_COLUMNS_SQL, &[scope, &routine.name])
            .await?;
        rows.iter()
            .map(|r| {
                let mode: Option<String> = field(r, "parameter_mode")?;
                let ordinal: i64 = field(r, "ordinal_position")?;
                Ok(ProcedureColumnRow {
                    column_name: field(r, "column_name")?,
                    type_name: field(r, "type_name")?,
                    column_type: parameter_kind_code(mode.as_deref()),
                    ordinal_position: i32::try_from(ordinal).unwrap_or(i32::MAX),
                })
            })
            .collect()
    }

    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<QueryRow>> {
        let rows = self.fetch("vendor catalog query", sql, params).await?;
        Ok(rows.iter().map(to_query_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_connection_string() {
        assert!(MySqlSource::validate_connection_string("mysql://root@localhost/shop").is_ok());
        assert!(MySqlSource::validate_connection_string("postgres://localhost/db").is_err());
        assert!(MySqlSource::validate_connection_string("::").is_err());
    }

    #[test]
    fn test_rule_keywords_map_to_portable_codes() {
        assert_eq!(rule_code(Some("CASCADE")), 0);
        assert_eq!(rule_code(Some("RESTRICT")), 1);
        assert_eq!(rule_code(Some("SET NULL")), 2);
        assert_eq!(rule_code(Some("NO ACTION")), 3);
        assert_eq!(rule_code(Some("SET DEFAULT")), 4);
        assert_eq!(rule_code(None), 3);
    }

    #[test]
    fn test_parameter_modes_and_index_types() {
        assert_eq!(parameter_kind_code(Some("IN")), codes::PROCEDURE_COLUMN_IN);
        assert_eq!(parameter_kind_code(Some("INOUT")), codes::PROCEDURE_COLUMN_INOUT);
        assert_eq!(parameter_kind_code(None), codes::PROCEDURE_COLUMN_RETURN);
        assert_eq!(index_type_code(Some("HASH")), codes::TABLE_INDEX_HASHED);
        assert_eq!(index_type_code(Some("BTREE")), codes::TABLE_INDEX_OTHER);
    }

    #[test]
    fn test_product_name_detects_mariadb() {
        assert_eq!(product_name_for("10.11.6-MariaDB-log"), "MariaDB");
        assert_eq!(product_name_for("8.0.36"), "MySQL");
    }

    #[test]
    fn test_oversized_lengths_saturate() {
        assert_eq!(narrow_i32(Some(4_294_967_295)), Some(i32::MAX));
        assert_eq!(narrow_i32(None), None);
        assert_eq!(table_type_text(TableType::Table), Some("BASE TABLE"));
    }
}
