//! Vendor-aware relational metadata extraction.
//!
//! Connects to a database through a [`source::CatalogSource`], picks a
//! vendor strategy from the product name, and walks schemas, tables,
//! views, keys, indexes, triggers and stored routines into an immutable
//! entity tree ([`models::Database`]) that serializes to JSON.
//!
//! # Security Guarantees
//! - All catalog access is read-only
//! - Credentials are never stored; endpoint URLs are redacted
//!
//! # Architecture
//! - `source`: standard introspection interface and its implementations
//! - `strategy`: the generic extraction pipeline and vendor profiles
//! - `registry`: strategy selection by product name
//! - `explorer`: one-database facade with caching and export
//! - `export`: filtered JSON export
//!
//! # Example
//! ```rust
//! use dbx_core::registry::StrategyRegistry;
//! use dbx_core::source::{ColumnRow, InMemorySource};
//! use dbx_core::strategy::MetadataStrategy;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let source = InMemorySource::new("PostgreSQL", "16.2")
//!     .with_schema("public")
//!     .with_table("public", "users")
//!     .with_column("public", "users", ColumnRow::new("id", "int4", 1));
//!
//! let strategy = StrategyRegistry::global().resolve("PostgreSQL").unwrap();
//! let database = strategy.explore(&source).await.unwrap();
//! assert_eq!(database.total_table_count(), 1);
//! # });
//! ```

pub mod config;
pub mod error;
pub mod explorer;
pub mod export;
pub mod logging;
pub mod models;
pub mod registry;
pub mod source;
pub mod strategy;

pub use config::{ConnectionConfig, ExplorerConfig};
pub use error::{MetadataError, Result, redact_database_url};
pub use explorer::DatabaseExplorer;
pub use export::{ExportFormat, ExportOptions, ExportResult, JsonExporter, filter_database};
pub use models::{Column, Database, Schema, Table, View};
pub use registry::StrategyRegistry;
pub use source::{CatalogSource, InMemorySource};
pub use strategy::{CatalogStrategy, MetadataStrategy, VendorProfile, Warnings};
