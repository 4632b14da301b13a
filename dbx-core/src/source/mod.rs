//! Catalog sources: the standard introspection interface.
//!
//! A [`CatalogSource`] answers the portable catalog questions (schemas,
//! relations, columns, keys, indexes, routines) as typed row sets whose
//! fields mirror the standard catalog row shapes, and runs parameterized
//! read queries for vendor catalogs the portable rows cannot describe.
//!
//! # Module Structure
//! - `rows`: row shapes and dynamically typed query rows
//! - `memory`: offline in-process catalog snapshot
//! - Driver-backed sources (postgres, mysql), feature-gated

use crate::Result;
use crate::models::TableType;
use async_trait::async_trait;

mod rows;

pub mod memory;

#[cfg(feature = "postgresql")]
pub mod postgres;

#[cfg(feature = "mysql")]
pub mod mysql;

pub use memory::{InMemorySource, SourceCall};
pub use rows::{
    ColumnRow, ImportedKeyRow, IndexInfoRow, ObjectName, PrimaryKeyRow, ProcedureColumnRow,
    ProcedureRow, ProductInfo, QueryRow, SchemaRow, SqlValue, TableRow, codes,
};

/// Standard, vendor-neutral introspection over one database connection.
///
/// # Security Guarantees
/// - All operations are read-only
/// - Credentials are never returned; `ProductInfo::url` is redacted
///
/// # Object Safety
/// This trait is object-safe, so strategies take `&dyn CatalogSource` and
/// explorers hold `Arc<dyn CatalogSource>`.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Server and driver identity.
    async fn product_info(&self) -> Result<ProductInfo>;

    /// Catalog names.
    async fn catalogs(&self) -> Result<Vec<String>>;

    /// Schema names with their catalog.
    async fn schemas(&self) -> Result<Vec<SchemaRow>>;

    /// Relations of one kind. `None` qualifiers do not filter.
    async fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        kind: TableType,
    ) -> Result<Vec<TableRow>>;

    /// Column rows for one relation, in any order.
    async fn columns(&self, object: &ObjectName) -> Result<Vec<ColumnRow>>;

    /// Primary-key rows for one table, in any order.
    async fn primary_keys(&self, object: &ObjectName) -> Result<Vec<PrimaryKeyRow>>;

    /// Imported foreign-key rows for one table, ordered by key then sequence.
    async fn imported_keys(&self, object: &ObjectName) -> Result<Vec<ImportedKeyRow>>;

    /// Index rows for one table, ordered by index then column position.
    async fn index_info(&self, object: &ObjectName) -> Result<Vec<IndexInfoRow>>;

    /// Routine rows in one catalog/schema.
    async fn procedures(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> Result<Vec<ProcedureRow>>;

    /// Parameter rows of one routine.
    async fn procedure_columns(&self, routine: &ObjectName) -> Result<Vec<ProcedureColumnRow>>;

    /// Runs a vendor catalog query with positional text parameters.
    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<QueryRow>>;
}

/// Opens a driver-backed source for a connection URL, chosen by scheme.
///
/// The pool connects lazily; the first catalog call establishes the
/// connection.
///
/// # Errors
/// Returns a configuration error for a malformed URL or a scheme whose
/// driver feature is not compiled in.
pub fn connect_source(database_url: &str) -> Result<std::sync::Arc<dyn CatalogSource>> {
    let url = url::Url::parse(database_url).map_err(|e| {
        crate::MetadataError::configuration(format!("Invalid database URL: {e}"))
    })?;

    match url.scheme() {
        #[cfg(feature = "postgresql")]
        "postgres" | "postgresql" => Ok(std::sync::Arc::new(postgres::PostgresSource::new(
            database_url,
        )?)),
        #[cfg(feature = "mysql")]
        "mysql" | "mariadb" => Ok(std::sync::Arc::new(mysql::MySqlSource::new(database_url)?)),
        scheme => Err(crate::MetadataError::configuration(format!(
            "Unsupported database scheme '{scheme}' (available: {})",
            supported_schemes().join(", ")
        ))),
    }
}

/// URL schemes accepted by [`connect_source`] in this build.
pub fn supported_schemes() -> Vec<&'static str> {
    let mut schemes = Vec::new();
    if cfg!(feature = "postgresql") {
        schemes.extend(["postgres", "postgresql"]);
    }
    if cfg!(feature = "mysql") {
        schemes.extend(["mysql", "mariadb"]);
    }
    schemes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_scheme_is_a_configuration_error() {
        let Err(err) = connect_source("oracle://scott:tiger@db/orcl") else {
            panic!("oracle scheme should be rejected");
        };
        assert!(matches!(err, crate::MetadataError::Configuration { .. }));
        assert!(!err.to_string().contains("tiger"));
    }

    #[test]
    fn test_malformed_url_is_rejected() {
        assert!(connect_source("not a url").is_err());
    }
}
