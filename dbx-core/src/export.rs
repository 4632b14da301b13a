//! Export of an extracted entity tree.
//!
//! Exports are filtered copies: disabled facets (comments, index detail,
//! triggers, routines, view bodies) are dropped before serialization.
//! With every facet enabled the tree is passed through untouched.

use crate::models::{Column, Database, Schema, Table, View};
use crate::{MetadataError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Output format. JSON is the only format produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Serialized with `serde_json`
    #[default]
    Json,
}

/// What to export and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Output format
    pub format: ExportFormat,
    /// Destination file; `None` keeps the document in memory
    pub output_path: Option<PathBuf>,
    /// Indent the JSON document
    pub pretty_print: bool,
    /// Keep stored routines
    pub include_procedures: bool,
    /// Keep triggers
    pub include_triggers: bool,
    /// Keep indexes
    pub include_index_details: bool,
    /// Keep table, view and column comments
    pub include_comments: bool,
    /// Keep view source text
    pub include_view_definitions: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            output_path: None,
            pretty_print: true,
            include_procedures: true,
            include_triggers: true,
            include_index_details: true,
            include_comments: true,
            include_view_definitions: true,
        }
    }
}

impl ExportOptions {
    /// Writes to `path` instead of returning the document
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Pretty-prints or compacts the JSON
    #[must_use]
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Toggles stored routines
    #[must_use]
    pub fn with_procedures(mut self, include: bool) -> Self {
        self.include_procedures = include;
        self
    }

    /// Toggles triggers
    #[must_use]
    pub fn with_triggers(mut self, include: bool) -> Self {
        self.include_triggers = include;
        self
    }

    /// Toggles indexes
    #[must_use]
    pub fn with_index_details(mut self, include: bool) -> Self {
        self.include_index_details = include;
        self
    }

    /// Toggles comments
    #[must_use]
    pub fn with_comments(mut self, include: bool) -> Self {
        self.include_comments = include;
        self
    }

    /// Toggles view source text
    #[must_use]
    pub fn with_view_definitions(mut self, include: bool) -> Self {
        self.include_view_definitions = include;
        self
    }

    /// Whether every facet is exported.
    pub fn all_included(&self) -> bool {
        self.include_procedures
            && self.include_triggers
            && self.include_index_details
            && self.include_comments
            && self.include_view_definitions
    }
}

/// Outcome of one export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportResult {
    /// Whether the document was produced
    pub success: bool,
    /// File written, if any
    pub output_path: Option<PathBuf>,
    /// Size of the document in bytes
    pub bytes_written: u64,
    /// Reason for failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// The serialized document when no output path was given
    #[serde(skip)]
    pub document: Option<String>,
}

impl ExportResult {
    /// Unsuccessful result carrying the error text
    pub fn failed(error: &MetadataError) -> Self {
        Self {
            success: false,
            error_message: Some(error.to_string()),
            ..Self::default()
        }
    }
}

/// Drops the facets `options` excludes.
///
/// Returns the input itself when every facet is included.
pub fn filter_database<'a>(database: &'a Database, options: &ExportOptions) -> Cow<'a, Database> {
    if options.all_included() {
        return Cow::Borrowed(database);
    }

    let schemas = database
        .schemas()
        .iter()
        .map(|schema| filter_schema(schema, options));

    Cow::Owned(
        database
            .identity_builder()
            .schemas(schemas)
            .warnings(database.warnings().iter().cloned())
            .build(),
    )
}

fn filter_schema(schema: &Schema, options: &ExportOptions) -> Schema {
    let procedures = if options.include_procedures {
        schema.procedures().to_vec()
    } else {
        Vec::new()
    };

    Schema::builder(schema.name())
        .catalog(schema.catalog().map(str::to_string))
        .owner(schema.owner().map(str::to_string))
        .tables(schema.tables().iter().map(|t| filter_table(t, options)))
        .views(schema.views().iter().map(|v| filter_view(v, options)))
        .procedures(procedures)
        .build()
}

fn filter_table(table: &Table, options: &ExportOptions) -> Table {
    let mut builder = table
        .to_builder()
        .columns(filter_columns(table.columns(), options));
    if !options.include_index_details {
        builder = builder.indexes(Vec::new());
    }
    if !options.include_triggers {
        builder = builder.triggers(Vec::new());
    }
    if !options.include_comments {
        builder = builder.comment(None);
    }
    builder.build()
}

fn filter_view(view: &View, options: &ExportOptions) -> View {
    let mut builder = view
        .to_builder()
        .columns(filter_columns(view.columns(), options));
    if !options.include_view_definitions {
        builder = builder.definition(None);
    }
    if !options.include_comments {
        builder = builder.comment(None);
    }
    builder.build()
}

fn filter_columns(columns: &[Column], options: &ExportOptions) -> Vec<Column> {
    if options.include_comments {
        return columns.to_vec();
    }
    columns
        .iter()
        .map(|c| c.to_builder().comment(None).build())
        .collect()
}

/// Writes entity trees as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl JsonExporter {
    /// New exporter
    pub fn new() -> Self {
        Self
    }

    /// Serializes the filtered tree.
    ///
    /// # Errors
    /// Returns a serialization error if the tree cannot be encoded.
    pub fn to_json(&self, database: &Database, options: &ExportOptions) -> Result<String> {
        let filtered = filter_database(database, options);
        let encoded = if options.pretty_print {
            serde_json::to_string_pretty(filtered.as_ref())
        } else {
            serde_json::to_string(filtered.as_ref())
        };
        encoded.map_err(|e| MetadataError::serialization("database metadata", e))
    }

    /// Serializes and, when an output path is set, writes the document,
    /// creating missing parent directories.
    ///
    /// # Errors
    /// Returns an error if serialization or the file write fails.
    pub async fn export(&self, database: &Database, options: &ExportOptions) -> Result<ExportResult> {
        let document = self.to_json(database, options)?;

        let Some(path) = &options.output_path else {
            return Ok(ExportResult {
                success: true,
                bytes_written: document.len() as u64,
                document: Some(document),
                ..ExportResult::default()
            });
        };

        write_document(path, &document).await?;
        info!(
            path = %path.display(),
            bytes = document.len(),
            "Exported database metadata"
        );

        Ok(ExportResult {
            success: true,
            output_path: Some(path.clone()),
            bytes_written: document.len() as u64,
            ..ExportResult::default()
        })
    }
}

async fn write_document(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            MetadataError::io(format!("Failed to create {}", parent.display()), e)
        })?;
    }

    tokio::fs::write(path, document)
        .await
        .map_err(|e| MetadataError::io(format!("Failed to write to {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Index, Procedure, SortOrder, Trigger};

    fn sample() -> Database {
        let table = Table::builder("orders")
            .column(
                Column::builder("id")
                    .data_type("int4")
                    .comment(Some("order id".to_string()))
                    .ordinal_position(1)
                    .build(),
            )
            .indexes(vec![Index::builder("orders_pkey").column("id", SortOrder::Asc, 1).build()])
            .triggers(vec![Trigger::builder("orders_audit", "orders").build()])
            .comment(Some("customer orders".to_string()))
            .build();
        let view = View::builder("open_orders")
            .definition(Some("SELECT * FROM orders".to_string()))
            .build();

        Database::builder()
            .product_name("PostgreSQL")
            .product_version("16.2")
            .schema(
                Schema::builder("public")
                    .table(table)
                    .view(view)
                    .procedures([Procedure::builder("close_order").build()])
                    .build(),
            )
            .warnings(["Failed to extract table audit_log: denied".to_string()])
            .build()
    }

    #[test]
    fn test_all_facets_pass_through_unchanged() {
        let db = sample();
        let filtered = filter_database(&db, &ExportOptions::default());
        assert!(matches!(filtered, Cow::Borrowed(_)));
        assert_eq!(filtered.as_ref(), &db);
    }

    #[test]
    fn test_disabled_facets_are_dropped() {
        let db = sample();
        let options = ExportOptions::default()
            .with_comments(false)
            .with_index_details(false)
            .with_triggers(false)
            .with_procedures(false)
            .with_view_definitions(false);

        let filtered = filter_database(&db, &options);
        let schema = filtered.find_schema("public").unwrap();
        let orders = schema.find_table("orders").unwrap();

        assert_eq!(orders.comment(), None);
        assert_eq!(orders.columns()[0].comment(), None);
        assert!(orders.indexes().is_empty());
        assert!(orders.triggers().is_empty());
        assert!(schema.procedures().is_empty());
        assert_eq!(schema.find_view("open_orders").unwrap().definition(), None);
        assert_eq!(filtered.warnings(), db.warnings());
        assert_eq!(filtered.extracted_at(), db.extracted_at());
    }

    #[test]
    fn test_single_toggle_keeps_other_facets() {
        let db = sample();
        let filtered = filter_database(&db, &ExportOptions::default().with_triggers(false));
        let orders = filtered.find_schema("public").unwrap().find_table("orders").unwrap();

        assert!(orders.triggers().is_empty());
        assert_eq!(orders.indexes().len(), 1);
        assert_eq!(orders.comment(), Some("customer orders"));
    }

    #[test]
    fn test_compact_json_has_no_newlines() {
        let json = JsonExporter::new()
            .to_json(&sample(), &ExportOptions::default().with_pretty_print(false))
            .unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"orders\""));
    }

    #[tokio::test]
    async fn test_export_without_path_returns_document() {
        let result = JsonExporter::new()
            .export(&sample(), &ExportOptions::default())
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output_path.is_none());
        let document = result.document.unwrap();
        assert_eq!(result.bytes_written, document.len() as u64);
    }
}
