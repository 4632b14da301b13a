//! High-level exploration entry point.
//!
//! A [`DatabaseExplorer`] pairs one catalog source with the strategy the
//! registry resolved for its product, runs explorations and exports.

use crate::config::ExplorerConfig;
use crate::export::{ExportOptions, ExportResult, JsonExporter};
use crate::models::{Database, Schema};
use crate::registry::StrategyRegistry;
use crate::source::{CatalogSource, ProductInfo};
use crate::strategy::{MetadataStrategy, Warnings};
use crate::{MetadataError, Result};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Explorer over one database.
///
/// # Example
/// ```rust
/// use dbx_core::explorer::DatabaseExplorer;
/// use dbx_core::registry::StrategyRegistry;
/// use dbx_core::source::InMemorySource;
/// use std::sync::Arc;
///
/// # tokio_test_block(async {
/// let source = Arc::new(InMemorySource::new("PostgreSQL", "16.2").with_schema("public"));
/// let explorer = DatabaseExplorer::connect(source, StrategyRegistry::global()).await?;
/// assert_eq!(explorer.vendor_name(), "PostgreSQL");
/// let database = explorer.explore().await?;
/// assert_eq!(database.schemas().len(), 1);
/// # Ok::<(), dbx_core::MetadataError>(())
/// # });
/// # fn tokio_test_block<F: std::future::Future<Output = Result<(), dbx_core::MetadataError>>>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f).unwrap();
/// # }
/// ```
pub struct DatabaseExplorer {
    source: Arc<dyn CatalogSource>,
    strategy: Arc<dyn MetadataStrategy>,
    product: ProductInfo,
    config: ExplorerConfig,
    cache: Mutex<Option<Arc<Database>>>,
}

impl DatabaseExplorer {
    /// Reads the product identity and resolves a strategy for it.
    ///
    /// # Errors
    /// Returns an error if the product identity cannot be read or no
    /// strategy supports the product.
    pub async fn connect(
        source: Arc<dyn CatalogSource>,
        registry: &StrategyRegistry,
    ) -> Result<Self> {
        let product = source.product_info().await?;
        let strategy = registry.resolve(&product.product_name)?;
        info!(
            product = %product.product_name,
            version = %product.product_version,
            vendor = strategy.vendor_name(),
            "Selected metadata strategy"
        );
        Ok(Self::assemble(source, strategy, product))
    }

    /// Uses the given strategy without consulting a registry.
    ///
    /// # Errors
    /// Returns an error if the product identity cannot be read.
    pub async fn with_strategy(
        source: Arc<dyn CatalogSource>,
        strategy: Arc<dyn MetadataStrategy>,
    ) -> Result<Self> {
        let product = source.product_info().await?;
        Ok(Self::assemble(source, strategy, product))
    }

    fn assemble(
        source: Arc<dyn CatalogSource>,
        strategy: Arc<dyn MetadataStrategy>,
        product: ProductInfo,
    ) -> Self {
        Self {
            source,
            strategy,
            product,
            config: ExplorerConfig::default(),
            cache: Mutex::new(None),
        }
    }

    /// Replaces the configuration.
    ///
    /// # Errors
    /// Returns a configuration error if `config` does not validate.
    pub fn with_config(mut self, config: ExplorerConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Active explorer settings
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Product name reported by the source
    pub fn product_name(&self) -> &str {
        &self.product.product_name
    }

    /// Product version reported by the source
    pub fn product_version(&self) -> &str {
        &self.product.product_version
    }

    /// Vendor name of the resolved strategy
    pub fn vendor_name(&self) -> &str {
        self.strategy.vendor_name()
    }

    /// Cached result of the last exploration, when caching is enabled.
    pub fn cached(&self) -> Option<Arc<Database>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Explores the whole database.
    ///
    /// # Errors
    /// Returns a configuration error when the explorer is disabled, or the
    /// fatal error that aborted the exploration.
    pub async fn explore(&self) -> Result<Arc<Database>> {
        if !self.config.enabled {
            return Err(MetadataError::configuration("Explorer is disabled"));
        }

        let started = Instant::now();
        let database = Arc::new(self.strategy.explore(self.source.as_ref()).await?);

        info!(
            vendor = self.vendor_name(),
            schemas = database.schemas().len(),
            tables = database.total_table_count(),
            views = database.total_view_count(),
            procedures = database.total_procedure_count(),
            elapsed_ms = started.elapsed().as_millis(),
            "Exploration finished"
        );
        if !database.warnings().is_empty() {
            warn!(
                count = database.warnings().len(),
                "Exploration finished with warnings"
            );
        }

        if self.config.cache_enabled {
            *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&database));
        }
        Ok(database)
    }

    /// Extracts a single schema.
    ///
    /// A schema the connection may not read yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns any failure other than a permission denial.
    pub async fn schema(&self, name: &str) -> Result<Option<Schema>> {
        let mut warnings = Warnings::new();
        match self
            .strategy
            .extract_schema(self.source.as_ref(), name, &mut warnings)
            .await
        {
            Ok(schema) => {
                debug!(schema = name, warnings = warnings.len(), "Extracted schema");
                Ok(Some(schema))
            }
            Err(e) if e.is_permission_error() => {
                warn!("Permission denied for schema: {}", name);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The configured default schema, if any.
    ///
    /// # Errors
    /// Returns any failure other than a permission denial.
    pub async fn default_schema(&self) -> Result<Option<Schema>> {
        match self.config.default_schema.as_deref() {
            Some(name) => self.schema(name).await,
            None => Ok(None),
        }
    }

    /// User schema names in ascending order.
    ///
    /// # Errors
    /// Returns an error if the schema listing fails.
    pub async fn list_schemas(&self) -> Result<Vec<String>> {
        self.strategy.list_schemas(self.source.as_ref()).await
    }

    /// Exports the cached tree, exploring first when nothing is cached.
    ///
    /// Failures are reported in the returned [`ExportResult`].
    pub async fn export(&self, options: &ExportOptions) -> ExportResult {
        let database = match self.cached() {
            Some(database) => database,
            None => match self.explore().await {
                Ok(database) => database,
                Err(e) => return ExportResult::failed(&e),
            },
        };

        match JsonExporter::new().export(&database, options).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Export failed: {}", e);
                ExportResult::failed(&e)
            }
        }
    }
}

impl std::fmt::Debug for DatabaseExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseExplorer")
            .field("product", &self.product.product_name)
            .field("vendor", &self.vendor_name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
