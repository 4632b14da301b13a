//! Configuration for connections and explorations.
//!
//! - [`ConnectionConfig`]: pool and session settings parsed from a URL
//! - [`ExplorerConfig`]: exploration behavior and default export toggles

mod connection;
mod explorer;

pub use connection::{ConnectionConfig, default_port};
pub use explorer::ExplorerConfig;
