//! Database connection configuration.
//!
//! [`ConnectionConfig`] never holds a password. It is derived from a
//! connection URL and drives pool sizing and per-session settings for the
//! driver-backed catalog sources.

use crate::error::{MetadataError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Upper bound on pool size and on URL-supplied timeouts (seconds).
const MAX_POOL_CONNECTIONS: u32 = 100;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Configuration for database connections.
///
/// # Security
/// This struct intentionally does NOT store passwords or credentials.
///
/// # Example
/// ```rust
/// use dbx_core::config::ConnectionConfig;
///
/// let config = ConnectionConfig::from_url("postgres://app:pw@db.internal/inventory").unwrap();
/// assert_eq!(config.port, Some(5432));
/// assert_eq!(config.database.as_deref(), Some("inventory"));
/// assert!(!config.to_string().contains("pw"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Database host address
    pub host: String,
    /// Port; filled with the vendor default when parsed from a URL
    pub port: Option<u16>,
    /// Database name
    pub database: Option<String>,
    /// Login name (password handled separately)
    pub username: Option<String>,
    /// Pool acquire timeout
    pub connect_timeout: Duration,
    /// Per-statement timeout applied to every pooled session
    pub query_timeout: Duration,
    /// Maximum number of connections in pool
    pub max_connections: u32,
    /// Whether sessions are forced read-only
    pub read_only: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: None,
            database: None,
            username: None,
            connect_timeout: Duration::from_secs(30),
            query_timeout: Duration::from_secs(30),
            max_connections: 5,
            read_only: true,
        }
    }
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ConnectionConfig({}{}{})",
            self.host,
            self.port.map_or_else(String::new, |p| format!(":{p}")),
            self.database
                .as_ref()
                .map_or_else(String::new, |db| format!("/{db}"))
        )
    }
}

/// Default port for a URL scheme, if the scheme is known.
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "postgres" | "postgresql" => Some(5432),
        "mysql" | "mariadb" => Some(3306),
        "sqlserver" | "mssql" => Some(1433),
        _ => None,
    }
}

impl ConnectionConfig {
    /// Creates a new connection config with safe defaults.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Parses host, port, database, user and tuning parameters from a URL.
    ///
    /// Recognized query parameters: `connect_timeout` (seconds),
    /// `statement_timeout` (milliseconds) and `pool_max_conns`. Out-of-range
    /// values are ignored.
    ///
    /// # Errors
    /// Returns a configuration error if the URL is malformed, names no
    /// host, or yields an invalid configuration.
    pub fn from_url(connection_string: &str) -> Result<Self> {
        let url = Url::parse(connection_string).map_err(|e| {
            MetadataError::configuration(format!("Invalid connection string format: {e}"))
        })?;

        let host = url
            .host_str()
            .ok_or_else(|| MetadataError::configuration("Connection string must specify a host"))?;

        let mut config = Self::new(host);
        config.port = url.port().or_else(|| default_port(url.scheme()));

        let database = url.path().trim_start_matches('/');
        if !database.is_empty() {
            config = config.with_database(database);
        }
        if !url.username().is_empty() {
            config = config.with_username(url.username());
        }

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "connect_timeout" => {
                    if let Ok(secs) = value.parse::<u64>()
                        && (1..=MAX_TIMEOUT_SECS).contains(&secs)
                    {
                        config.connect_timeout = Duration::from_secs(secs);
                    }
                }
                "statement_timeout" => {
                    if let Ok(ms) = value.parse::<u64>()
                        && (1_000..=MAX_TIMEOUT_SECS * 1_000).contains(&ms)
                    {
                        config.query_timeout = Duration::from_millis(ms);
                    }
                }
                "pool_max_conns" => {
                    if let Ok(max) = value.parse::<u32>()
                        && (1..=MAX_POOL_CONNECTIONS).contains(&max)
                    {
                        config.max_connections = max;
                    }
                }
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if configuration values are invalid or unsafe
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(MetadataError::configuration("host cannot be empty"));
        }

        if self.port == Some(0) {
            return Err(MetadataError::configuration("port must be greater than 0"));
        }

        if self.max_connections == 0 {
            return Err(MetadataError::configuration(
                "max_connections must be greater than 0",
            ));
        }

        if self.max_connections > MAX_POOL_CONNECTIONS {
            return Err(MetadataError::configuration(
                "max_connections should not exceed 100",
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(MetadataError::configuration(
                "connect_timeout must be greater than 0",
            ));
        }

        if self.query_timeout.as_secs() == 0 {
            return Err(MetadataError::configuration(
                "query_timeout must be at least one second",
            ));
        }

        Ok(())
    }

    /// Sets an explicit port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the database name
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the login name (never the password)
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the pool size
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets the per-query timeout
    #[must_use]
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_config_default() {
        let config = ConnectionConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, None);
        assert_eq!(config.max_connections, 5);
        assert!(config.read_only);
    }

    #[test]
    fn test_connection_config_validation() {
        assert!(ConnectionConfig::new("localhost").validate().is_ok());

        let config = ConnectionConfig {
            host: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConnectionConfig {
            port: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConnectionConfig::default().with_max_connections(101);
        assert!(config.validate().is_err());

        let config = ConnectionConfig::default().with_query_timeout(Duration::from_millis(10));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_url_fills_vendor_default_port() {
        let pg = ConnectionConfig::from_url("postgresql://u@pg.local/app").unwrap();
        let my = ConnectionConfig::from_url("mysql://u@my.local/shop").unwrap();
        let explicit = ConnectionConfig::from_url("postgres://u@pg.local:6543/app").unwrap();

        assert_eq!(pg.port, Some(5432));
        assert_eq!(my.port, Some(3306));
        assert_eq!(explicit.port, Some(6543));
        assert_eq!(my.database.as_deref(), Some("shop"));
        assert_eq!(my.username.as_deref(), Some("u"));
    }

    #[test]
    fn test_from_url_reads_tuning_parameters() {
        let config = ConnectionConfig::from_url(
            "postgres://db.local/app?connect_timeout=5&statement_timeout=15000&pool_max_conns=2",
        )
        .unwrap();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.query_timeout, Duration::from_secs(15));
        assert_eq!(config.max_connections, 2);

        let ignored = ConnectionConfig::from_url("postgres://db.local/app?pool_max_conns=500").unwrap();
        assert_eq!(ignored.max_connections, 5);
    }

    #[test]
    fn test_from_url_rejects_malformed_input() {
        assert!(ConnectionConfig::from_url("not a url").is_err());
        assert!(ConnectionConfig::from_url("postgres:///app").is_err());
    }

    #[test]
    fn test_display_never_includes_user() {
        let config = ConnectionConfig::new("example.com")
            .with_port(5432)
            .with_database("testdb")
            .with_username("testuser");

        let display = config.to_string();
        assert!(display.contains("example.com:5432/testdb"));
        assert!(!display.contains("testuser"));
    }
}
