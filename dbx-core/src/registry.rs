//! Strategy selection by product name.
//!
//! The registry keeps specific strategies ahead of fallbacks, so the
//! first strategy whose `supports` accepts a product wins and the generic
//! strategy is only reached when nothing else claims it.

use crate::strategy::{
    CatalogStrategy, MetadataStrategy, generic_profile, mssql_profile, mysql_profile,
    postgres_profile,
};
use crate::{MetadataError, Result};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

/// Ordered, thread-safe collection of strategies.
///
/// # Example
/// ```rust
/// use dbx_core::registry::StrategyRegistry;
///
/// let registry = StrategyRegistry::with_defaults();
/// let strategy = registry.resolve("Microsoft SQL Server 2019").unwrap();
/// assert_eq!(strategy.vendor_name(), "MSSQL");
/// assert_eq!(registry.resolve("FooDB 1.0").unwrap().vendor_name(), "Generic");
/// ```
pub struct StrategyRegistry {
    strategies: Mutex<Vec<Arc<dyn MetadataStrategy>>>,
}

impl StrategyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            strategies: Mutex::new(Vec::new()),
        }
    }

    /// A registry holding the PostgreSQL, MySQL, SQL Server and generic
    /// strategies.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for profile in [
            postgres_profile(),
            mysql_profile(),
            mssql_profile(),
            generic_profile(),
        ] {
            registry.register(Arc::new(CatalogStrategy::new(profile)));
        }
        registry
    }

    /// Process-wide registry with the built-in strategies.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<StrategyRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::with_defaults)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn MetadataStrategy>>> {
        self.strategies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a strategy, replacing any with the same vendor name.
    ///
    /// Specific strategies are placed ahead of existing ones; fallbacks go
    /// to the end.
    pub fn register(&self, strategy: Arc<dyn MetadataStrategy>) {
        let mut strategies = self.lock();
        strategies.retain(|existing| existing.vendor_name() != strategy.vendor_name());
        debug!(
            vendor = strategy.vendor_name(),
            fallback = strategy.is_fallback(),
            "Registering metadata strategy"
        );
        if strategy.is_fallback() {
            strategies.push(strategy);
        } else {
            strategies.insert(0, strategy);
        }
    }

    /// Strategies in resolution order.
    pub fn strategies(&self) -> Vec<Arc<dyn MetadataStrategy>> {
        self.lock().clone()
    }

    /// Vendor names in resolution order
    pub fn vendor_names(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|s| s.vendor_name().to_string())
            .collect()
    }

    /// First strategy supporting the product name.
    ///
    /// # Errors
    /// Returns a configuration error when no strategy, not even a
    /// fallback, accepts the product.
    pub fn resolve(&self, product_name: &str) -> Result<Arc<dyn MetadataStrategy>> {
        let product = product_name.to_lowercase();
        self.lock()
            .iter()
            .find(|s| s.supports(&product))
            .cloned()
            .ok_or_else(|| {
                MetadataError::configuration(format!(
                    "No metadata strategy supports database product '{product_name}'"
                ))
            })
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("vendors", &self.vendor_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::VendorProfile;

    #[test]
    fn test_defaults_resolve_known_vendors() {
        let registry = StrategyRegistry::with_defaults();
        let cases = [
            ("PostgreSQL", "PostgreSQL"),
            ("MySQL", "MySQL"),
            ("MariaDB", "MySQL"),
            ("Microsoft SQL Server", "MSSQL"),
            ("SQLite", "Generic"),
        ];
        for (product, vendor) in cases {
            assert_eq!(registry.resolve(product).unwrap().vendor_name(), vendor, "{product}");
        }
    }

    #[test]
    fn test_fallback_stays_last_after_registration() {
        let registry = StrategyRegistry::with_defaults();
        registry.register(Arc::new(CatalogStrategy::new(
            VendorProfile::new("Oracle").with_needles(["oracle"]),
        )));

        let names = registry.vendor_names();
        assert_eq!(names.first().map(String::as_str), Some("Oracle"));
        assert_eq!(names.last().map(String::as_str), Some("Generic"));
        assert_eq!(registry.resolve("Oracle Database 19c").unwrap().vendor_name(), "Oracle");
    }

    #[test]
    fn test_register_replaces_same_vendor() {
        let registry = StrategyRegistry::with_defaults();
        let before = registry.strategies().len();
        registry.register(Arc::new(CatalogStrategy::new(
            VendorProfile::new("MySQL").with_needles(["percona"]),
        )));

        assert_eq!(registry.strategies().len(), before);
        assert_eq!(registry.resolve("Percona Server").unwrap().vendor_name(), "MySQL");
    }

    #[test]
    fn test_empty_registry_reports_unsupported_product() {
        let registry = StrategyRegistry::new();
        let Err(err) = registry.resolve("PostgreSQL") else {
            panic!("empty registry should not resolve");
        };
        assert!(matches!(err, MetadataError::Configuration { .. }));
    }

    #[test]
    fn test_global_registry_is_shared() {
        assert!(std::ptr::eq(StrategyRegistry::global(), StrategyRegistry::global()));
        assert_eq!(StrategyRegistry::global().vendor_names().len(), 4);
    }
}
