//! Extraction strategies.
//!
//! A [`MetadataStrategy`] walks one database through a
//! [`CatalogSource`] and assembles the entity tree. The shipped
//! implementation is a single generic pipeline, [`CatalogStrategy`],
//! specialized per vendor by a [`VendorProfile`] value.
//!
//! # Module Structure
//! - `profile`: per-vendor configuration (matching, filters, vendor SQL)
//! - `pipeline`: the template algorithm shared by every vendor
//! - `postgres`, `mysql`, `mssql`, `generic`: shipped profiles

use crate::Result;
use crate::models::{Column, Database, ForeignKey, Index, Procedure, Schema, Table, Trigger, View};
use crate::source::{CatalogSource, ObjectName};
use async_trait::async_trait;

mod generic;
mod mssql;
mod mysql;
mod pipeline;
mod postgres;
mod profile;


pub use generic::generic_profile;
pub use mssql::mssql_profile;
pub use mysql::mysql_profile;
pub use pipeline::CatalogStrategy;
pub use postgres::postgres_profile;
pub use profile::{NameCase, ProcedureFailurePolicy, SchemaModel, VendorProfile, VendorQueries};

/// Non-fatal gaps recorded during one exploration.
///
/// Every pushed warning is also logged at `warn` level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings(Vec<String>);

impl Warnings {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and logs it
    pub fn push(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        tracing::warn!("{}", warning);
        self.0.push(warning);
    }

    /// Number of recorded warnings
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded warnings in the order they were pushed
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Consumes the accumulator, keeping push order
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Vendor-specific extraction contract.
///
/// Operations that can record a warning take the per-run [`Warnings`]
/// accumulator explicitly, so one strategy value can serve concurrent
/// explorations on distinct sources.
///
/// # Object Safety
/// This trait is object-safe; the registry stores
/// `Arc<dyn MetadataStrategy>`.
#[async_trait]
pub trait MetadataStrategy: Send + Sync {
    /// Whether this strategy handles the given product name.
    fn supports(&self, product_name: &str) -> bool;

    /// Display name of the vendor, unique within a registry.
    fn vendor_name(&self) -> &str;

    /// Whether this is the catch-all strategy resolved last.
    fn is_fallback(&self) -> bool {
        false
    }

    /// Walks the whole database.
    ///
    /// A schema denied by permissions becomes a warning; any other schema
    /// failure aborts the exploration.
    ///
    /// # Errors
    /// Returns an error if the product identity or schema list cannot be
    /// read, or a schema fails for a reason other than permissions.
    async fn explore(&self, source: &dyn CatalogSource) -> Result<Database>;

    /// User schema names in ascending order.
    ///
    /// # Errors
    /// Returns an error if neither schemas nor catalogs can be listed.
    async fn list_schemas(&self, source: &dyn CatalogSource) -> Result<Vec<String>>;

    /// Extracts one schema; failed tables, views and routines become warnings.
    ///
    /// # Errors
    /// Returns an error if the schema's relations cannot be listed.
    async fn extract_schema(
        &self,
        source: &dyn CatalogSource,
        schema_name: &str,
        warnings: &mut Warnings,
    ) -> Result<Schema>;

    /// Extracts one base table with keys, indexes, triggers and comment.
    ///
    /// # Errors
    /// Returns an error if the columns, primary key, foreign keys or indexes
    /// cannot be read. Trigger and comment lookups are best-effort.
    async fn extract_table(&self, source: &dyn CatalogSource, table: &ObjectName) -> Result<Table>;

    /// Columns of a table or view in ordinal order.
    ///
    /// # Errors
    /// Returns an error if the column rows cannot be read.
    async fn extract_columns(
        &self,
        source: &dyn CatalogSource,
        relation: &ObjectName,
    ) -> Result<Vec<Column>>;

    /// Imported foreign keys, one per key name in first-seen order.
    ///
    /// # Errors
    /// Returns an error if the imported-key rows cannot be read.
    async fn extract_foreign_keys(
        &self,
        source: &dyn CatalogSource,
        table: &ObjectName,
    ) -> Result<Vec<ForeignKey>>;

    /// Indexes grouped by name; statistics rows without a name are skipped.
    ///
    /// # Errors
    /// Returns an error if the index rows cannot be read.
    async fn extract_indexes(
        &self,
        source: &dyn CatalogSource,
        table: &ObjectName,
    ) -> Result<Vec<Index>>;

    /// Every trigger in one schema. Vendor failures degrade to an empty
    /// list plus a warning.
    ///
    /// # Errors
    /// [`CatalogStrategy`] never returns one; query failures become warnings.
    async fn extract_triggers(
        &self,
        source: &dyn CatalogSource,
        catalog: Option<&str>,
        schema: Option<&str>,
        warnings: &mut Warnings,
    ) -> Result<Vec<Trigger>>;

    /// Stored routines of one schema, sorted by name.
    ///
    /// # Errors
    /// Returns an error if the standard routine listing fails where the
    /// vendor policy does not turn the failure into a warning.
    async fn extract_procedures(
        &self,
        source: &dyn CatalogSource,
        catalog: Option<&str>,
        schema: Option<&str>,
        warnings: &mut Warnings,
    ) -> Result<Vec<Procedure>>;

    /// Extracts one view with its columns and, where the vendor exposes it,
    /// its definition text.
    ///
    /// # Errors
    /// Returns an error if the view's columns cannot be read.
    async fn extract_view(&self, source: &dyn CatalogSource, view: &ObjectName) -> Result<View>;
}
