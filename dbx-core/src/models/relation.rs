use super::{Column, ForeignKey, Index, PrimaryKey, Trigger};
use serde::{Deserialize, Serialize};

/// Relation kind as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableType {
    /// Base table
    #[default]
    Table,
    /// View
    View,
    /// Catalog-owned table
    SystemTable,
    /// Global temporary table
    GlobalTemporary,
    /// Session temporary table
    LocalTemporary,
    /// Alias of another relation
    Alias,
    /// Synonym of another relation
    Synonym,
}

impl TableType {
    /// Catalog spelling of the kind, e.g. `SYSTEM TABLE`.
    pub fn as_catalog_str(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
            Self::SystemTable => "SYSTEM TABLE",
            Self::GlobalTemporary => "GLOBAL TEMPORARY",
            Self::LocalTemporary => "LOCAL TEMPORARY",
            Self::Alias => "ALIAS",
            Self::Synonym => "SYNONYM",
        }
    }
}

impl std::fmt::Display for TableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_catalog_str())
    }
}

/// A table with its columns, keys, indexes and triggers.
///
/// Columns are kept in strictly increasing ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    table_type: TableType,
    columns: Box<[Column]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_key: Option<PrimaryKey>,
    foreign_keys: Box<[ForeignKey]>,
    indexes: Box<[Index]>,
    triggers: Box<[Trigger]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    row_count: Option<u64>,
}

impl Table {
    /// Starts a base table with the given name
    pub fn builder(name: impl Into<String>) -> TableBuilder {
        TableBuilder {
            name: name.into(),
            table_type: TableType::Table,
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            triggers: Vec::new(),
            comment: None,
            row_count: None,
        }
    }

    /// Copies every field into a fresh builder.
    pub fn to_builder(&self) -> TableBuilder {
        TableBuilder {
            name: self.name.clone(),
            table_type: self.table_type,
            columns: self.columns.to_vec(),
            primary_key: self.primary_key.clone(),
            foreign_keys: self.foreign_keys.to_vec(),
            indexes: self.indexes.to_vec(),
            triggers: self.triggers.to_vec(),
            comment: self.comment.clone(),
            row_count: self.row_count,
        }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relation kind
    pub fn table_type(&self) -> TableType {
        self.table_type
    }

    /// Columns in ordinal order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Primary key; `None` when the table has none
    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    /// Imported foreign keys
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Indexes
    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Triggers defined on this table
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Table comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Row estimate, when known
    pub fn row_count(&self) -> Option<u64> {
        self.row_count
    }

    /// Looks up a column by exact name.
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Column names in ordinal order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }
}

/// Staging value for [`Table`].
#[derive(Debug, Clone)]
#[must_use]
pub struct TableBuilder {
    name: String,
    table_type: TableType,
    columns: Vec<Column>,
    primary_key: Option<PrimaryKey>,
    foreign_keys: Vec<ForeignKey>,
    indexes: Vec<Index>,
    triggers: Vec<Trigger>,
    comment: Option<String>,
    row_count: Option<u64>,
}

impl TableBuilder {
    /// Sets the relation kind
    pub fn table_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    /// Replaces the column sequence.
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Appends a column
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the primary key
    pub fn primary_key(mut self, primary_key: Option<PrimaryKey>) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Replaces the foreign keys
    pub fn foreign_keys(mut self, foreign_keys: Vec<ForeignKey>) -> Self {
        self.foreign_keys = foreign_keys;
        self
    }

    /// Replaces the indexes
    pub fn indexes(mut self, indexes: Vec<Index>) -> Self {
        self.indexes = indexes;
        self
    }

    /// Replaces the triggers
    pub fn triggers(mut self, triggers: Vec<Trigger>) -> Self {
        self.triggers = triggers;
        self
    }

    /// Sets the comment
    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// Sets the row estimate
    pub fn row_count(mut self, row_count: Option<u64>) -> Self {
        self.row_count = row_count;
        self
    }

    /// Finishes the table, ordering columns by ordinal position.
    pub fn build(mut self) -> Table {
        self.columns.sort_by_key(Column::ordinal_position);
        Table {
            name: self.name,
            table_type: self.table_type,
            columns: self.columns.into_boxed_slice(),
            primary_key: self.primary_key,
            foreign_keys: self.foreign_keys.into_boxed_slice(),
            indexes: self.indexes.into_boxed_slice(),
            triggers: self.triggers.into_boxed_slice(),
            comment: self.comment,
            row_count: self.row_count,
        }
    }
}

/// A view with its columns and source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    name: String,
    columns: Box<[Column]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    updatable: bool,
}

impl View {
    /// Starts a view with the given name
    pub fn builder(name: impl Into<String>) -> ViewBuilder {
        ViewBuilder {
            name: name.into(),
            columns: Vec::new(),
            definition: None,
            comment: None,
            updatable: false,
        }
    }

    /// Copies every field into a fresh builder.
    pub fn to_builder(&self) -> ViewBuilder {
        ViewBuilder {
            name: self.name.clone(),
            columns: self.columns.to_vec(),
            definition: self.definition.clone(),
            comment: self.comment.clone(),
            updatable: self.updatable,
        }
    }

    /// View name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in ordinal order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Source text, when the vendor exposes it
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    /// View comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Whether the view accepts writes
    pub fn is_updatable(&self) -> bool {
        self.updatable
    }

    /// Looks up a column by exact name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Column names in ordinal order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }
}

/// Staging value for [`View`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ViewBuilder {
    name: String,
    columns: Vec<Column>,
    definition: Option<String>,
    comment: Option<String>,
    updatable: bool,
}

impl ViewBuilder {
    /// Replaces the column sequence
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Appends a column
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the source text
    pub fn definition(mut self, definition: Option<String>) -> Self {
        self.definition = definition;
        self
    }

    /// Sets the comment
    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// Sets updatability
    pub fn updatable(mut self, updatable: bool) -> Self {
        self.updatable = updatable;
        self
    }

    /// Finishes the view, ordering columns by ordinal position
    pub fn build(mut self) -> View {
        self.columns.sort_by_key(Column::ordinal_position);
        View {
            name: self.name,
            columns: self.columns.into_boxed_slice(),
            definition: self.definition,
            comment: self.comment,
            updatable: self.updatable,
        }
    }
}
