//! Command bodies, independent of how the catalog source was opened.

use anyhow::{Context, Result, bail};
use dbx_core::registry::StrategyRegistry;
use dbx_core::source::CatalogSource;
use dbx_core::{DatabaseExplorer, ExportOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// What one `explore` run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreSummary {
    /// Product name and version as reported by the server
    pub product: String,
    /// Name of the strategy that ran
    pub vendor: String,
    /// Schemas explored
    pub schemas: usize,
    /// Tables across all schemas
    pub tables: usize,
    /// Views across all schemas
    pub views: usize,
    /// Routines across all schemas
    pub procedures: usize,
    /// Non-fatal extraction failures
    pub warnings: Vec<String>,
    /// File written, if one was requested
    pub output_path: Option<PathBuf>,
    /// Length of the JSON document in bytes
    pub bytes_written: u64,
    /// The JSON document when no output path was requested
    pub document: Option<String>,
}

/// Explores the database and exports it with `options`.
///
/// # Errors
/// Returns an error if no strategy applies, the exploration aborts, or the
/// export fails.
pub async fn explore(
    source: Arc<dyn CatalogSource>,
    registry: &StrategyRegistry,
    options: &ExportOptions,
) -> Result<ExploreSummary> {
    let explorer = DatabaseExplorer::connect(source, registry)
        .await
        .context("Failed to identify the database product")?;
    let database = explorer.explore().await.context("Exploration failed")?;

    let result = dbx_core::JsonExporter::new()
        .export(&database, options)
        .await
        .context("Failed to export metadata")?;
    if !result.success {
        bail!(
            "Export failed: {}",
            result.error_message.unwrap_or_default()
        );
    }

    Ok(ExploreSummary {
        product: format!("{} {}", explorer.product_name(), explorer.product_version()),
        vendor: explorer.vendor_name().to_string(),
        schemas: database.schemas().len(),
        tables: database.total_table_count(),
        views: database.total_view_count(),
        procedures: database.total_procedure_count(),
        warnings: database.warnings().to_vec(),
        output_path: result.output_path,
        bytes_written: result.bytes_written,
        document: result.document,
    })
}

/// User schema names in ascending order.
///
/// # Errors
/// Returns an error if the product cannot be identified or listing fails.
pub async fn list_schemas(
    source: Arc<dyn CatalogSource>,
    registry: &StrategyRegistry,
) -> Result<Vec<String>> {
    let explorer = DatabaseExplorer::connect(source, registry)
        .await
        .context("Failed to identify the database product")?;
    explorer
        .list_schemas()
        .await
        .context("Failed to list schemas")
}

/// Reads the product identity and names the strategy that would run.
///
/// # Errors
/// Returns an error if the connection or product lookup fails.
pub async fn test_connection(
    source: Arc<dyn CatalogSource>,
    registry: &StrategyRegistry,
) -> Result<String> {
    let explorer = DatabaseExplorer::connect(source, registry)
        .await
        .context("Connection test failed")?;
    info!("Connection test successful");
    Ok(format!(
        "{} {} (strategy: {})",
        explorer.product_name(),
        explorer.product_version(),
        explorer.vendor_name()
    ))
}

/// Registered vendor names in resolution order.
#[must_use]
pub fn vendors(registry: &StrategyRegistry) -> Vec<String> {
    registry.vendor_names()
}
