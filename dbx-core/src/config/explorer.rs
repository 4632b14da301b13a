use crate::error::{MetadataError, Result};
use crate::export::ExportOptions;
use serde::{Deserialize, Serialize};

/// Settings for a [`DatabaseExplorer`](crate::explorer::DatabaseExplorer).
///
/// Deserializes from partial documents; missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Refuse to explore when false
    pub enabled: bool,
    /// Keep the last exploration and reuse it for exports
    pub cache_enabled: bool,
    /// Schema returned by `default_schema()`
    pub default_schema: Option<String>,
    /// Export stored routines by default
    pub include_procedures: bool,
    /// Export triggers by default
    pub include_triggers: bool,
    /// Export view source text by default
    pub include_view_definitions: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_enabled: false,
            default_schema: None,
            include_procedures: true,
            include_triggers: true,
            include_view_definitions: true,
        }
    }
}

impl ExplorerConfig {
    /// Export options with this configuration's inclusion toggles applied.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::default()
            .with_procedures(self.include_procedures)
            .with_triggers(self.include_triggers)
            .with_view_definitions(self.include_view_definitions)
    }

    /// Checks the settings before an explorer accepts them.
    ///
    /// # Errors
    /// Returns a configuration error if `default_schema` is set but blank.
    pub fn validate(&self) -> Result<()> {
        if self
            .default_schema
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
        {
            return Err(MetadataError::configuration(
                "default_schema cannot be empty",
            ));
        }
        Ok(())
    }

    /// Enables or disables result caching
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Sets the schema used by `default_schema()`
    #[must_use]
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExplorerConfig::default();
        assert!(config.enabled);
        assert!(!config.cache_enabled);
        assert!(config.export_options().all_included());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: ExplorerConfig =
            serde_json::from_str(r#"{"cache_enabled": true, "include_triggers": false}"#).unwrap();
        assert!(config.cache_enabled);
        assert!(config.include_procedures);

        let options = config.export_options();
        assert!(!options.include_triggers);
        assert!(options.include_procedures);
        assert!(!options.all_included());
    }

    #[test]
    fn test_blank_default_schema_is_rejected() {
        assert!(ExplorerConfig::default().with_default_schema("  ").validate().is_err());
        assert!(ExplorerConfig::default().with_default_schema("public").validate().is_ok());
    }
}
