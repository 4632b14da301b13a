//! Database metadata explorer.
//!
//! Connects to a database, resolves the vendor strategy from the reported
//! product name and writes the extracted metadata as JSON.
//!
//! # Security Guarantees
//! - Read-only catalog queries only
//! - Connection URLs are redacted before they are logged or printed

use anyhow::{Context, Result};
use clap::Parser;
use dbx_collect::{Cli, Command, commands, validate_database_url};
use dbx_core::logging::{LogFormat, init_logging_with};
use dbx_core::registry::StrategyRegistry;
use dbx_core::source::{CatalogSource, connect_source};
use dbx_core::redact_database_url;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.global.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_logging_with(cli.global.verbose, cli.global.quiet, format)?;

    let registry = StrategyRegistry::global();

    match cli.command {
        Command::Explore(args) => {
            let source = open(&args.target.database_url)?;
            let summary = commands::explore(source, registry, &args.export_options()).await?;
            match (&summary.output_path, &summary.document) {
                (Some(path), _) => {
                    info!("Metadata saved to {}", path.display());
                    eprintln!("Explored {} using the {} strategy", summary.product, summary.vendor);
                    eprintln!("Output: {} ({} bytes)", path.display(), summary.bytes_written);
                    eprintln!(
                        "Schemas: {}, tables: {}, views: {}, routines: {}, warnings: {}",
                        summary.schemas,
                        summary.tables,
                        summary.views,
                        summary.procedures,
                        summary.warnings.len()
                    );
                }
                (None, Some(document)) => println!("{document}"),
                (None, None) => {}
            }
        }
        Command::Schemas(args) => {
            let source = open(&args.database_url)?;
            for schema in commands::list_schemas(source, registry).await? {
                println!("{schema}");
            }
        }
        Command::Test(args) => {
            let source = open(&args.database_url)?;
            let report = commands::test_connection(source, registry).await?;
            println!("Connection successful: {report}");
        }
        Command::Vendors => {
            for vendor in commands::vendors(registry) {
                println!("{vendor}");
            }
        }
    }

    Ok(())
}

fn open(database_url: &str) -> Result<Arc<dyn CatalogSource>> {
    let redacted = redact_database_url(database_url);
    if !validate_database_url(database_url) {
        anyhow::bail!("Unsupported or malformed database URL: {redacted}");
    }
    info!("Target: {}", redacted);
    connect_source(database_url).with_context(|| format!("Failed to open {redacted}"))
}
