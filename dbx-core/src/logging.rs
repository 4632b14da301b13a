//! Logging setup for hosts embedding the explorer.
//!
//! `RUST_LOG`, when set, overrides the verbosity flags.

use crate::{MetadataError, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Line format of emitted log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Maps verbosity flags to a level: quiet is ERROR, then 0=INFO, 1=DEBUG,
/// 2+=TRACE.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Initializes text logging on stderr.
///
/// # Example
/// ```rust,no_run
/// use dbx_core::logging::init_logging;
///
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
///
/// # Errors
/// Returns a configuration error if a global subscriber is already set.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    init_logging_with(verbose, quiet, LogFormat::Text)
}

/// Initializes logging in the given format.
///
/// # Errors
/// Returns a configuration error if a global subscriber is already set.
pub fn init_logging_with(verbose: u8, quiet: bool, format: LogFormat) -> Result<()> {
    let level = level_for(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| {
        MetadataError::configuration(format!("Failed to initialize logging: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        let cases = [
            ((true, 0), Level::ERROR),
            ((true, 5), Level::ERROR),
            ((false, 0), Level::INFO),
            ((false, 1), Level::DEBUG),
            ((false, 2), Level::TRACE),
            ((false, 10), Level::TRACE),
        ];

        for ((quiet, verbose), expected) in cases {
            assert_eq!(level_for(verbose, quiet), expected, "quiet={quiet}, verbose={verbose}");
        }
    }

    #[test]
    fn test_second_initialization_is_an_error() {
        let _ = init_logging(0, true);
        assert!(init_logging_with(0, true, LogFormat::Json).is_err());
    }
}
