//! Command-line surface of the metadata explorer.
//!
//! Argument parsing and command bodies live here so they can be tested
//! without spawning the binary; `main.rs` only wires them together.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use dbx_core::ExportOptions;
use std::path::PathBuf;

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "dbx-collect")]
#[command(about = "Relational database metadata explorer")]
#[command(version)]
#[command(long_about = "
dbx-collect - read-only relational metadata explorer

Connects to a database, identifies the vendor from the reported product
name, and walks schemas, tables, views, keys, indexes, triggers and stored
routines into a JSON document.

SUPPORTED DATABASES:
- PostgreSQL (postgres://)
- MySQL / MariaDB (mysql://) [if compiled with --features mysql]

EXAMPLES:
  dbx-collect explore postgres://user@localhost/app -o app.json
  dbx-collect explore --no-procedures --compact postgres://localhost/app
  DATABASE_URL=postgres://localhost/app dbx-collect schemas
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Explore the database and write its metadata as JSON
    Explore(ExploreArgs),
    /// List user schemas
    Schemas(TargetArgs),
    /// Check connectivity and show which strategy would be used
    Test(TargetArgs),
    /// List the vendor strategies compiled in
    Vendors,
}

/// Connection target shared by every subcommand
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Database connection URL (credentials are redacted in all output)
    #[arg(env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

/// Arguments of `explore`
#[derive(Debug, Args)]
pub struct ExploreArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output file; the document is printed to stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Omit stored procedures and functions
    #[arg(long)]
    pub no_procedures: bool,

    /// Omit triggers
    #[arg(long)]
    pub no_triggers: bool,

    /// Omit index details
    #[arg(long)]
    pub no_indexes: bool,

    /// Omit table, view and column comments
    #[arg(long)]
    pub no_comments: bool,

    /// Omit view source text
    #[arg(long)]
    pub no_view_definitions: bool,
}

impl ExploreArgs {
    /// Export options selected by the flags.
    pub fn export_options(&self) -> ExportOptions {
        let options = ExportOptions::default()
            .with_pretty_print(!self.compact)
            .with_procedures(!self.no_procedures)
            .with_triggers(!self.no_triggers)
            .with_index_details(!self.no_indexes)
            .with_comments(!self.no_comments)
            .with_view_definitions(!self.no_view_definitions);
        match &self.output {
            Some(path) => options.with_output_path(path),
            None => options,
        }
    }
}

/// Logging flags accepted by every subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all log output except errors")]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Checks that a URL parses, has a host, and names a scheme this build can
/// open. Never logs the URL.
#[must_use]
pub fn validate_database_url(url: &str) -> bool {
    if url.trim().is_empty() {
        return false;
    }
    url::Url::parse(url).is_ok_and(|parsed| {
        parsed.host_str().is_some_and(|h| !h.is_empty())
            && dbx_core::source::supported_schemes().contains(&parsed.scheme())
    })
}
