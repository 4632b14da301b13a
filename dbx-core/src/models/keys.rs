use serde::{Deserialize, Serialize};

/// Primary key of a table. Column order is key-sequence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    columns: Box<[String]>,
}

impl PrimaryKey {
    /// Starts an empty key
    pub fn builder() -> PrimaryKeyBuilder {
        PrimaryKeyBuilder::default()
    }

    /// Constraint name, when the vendor reports one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Key columns in key-sequence order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether `column` is part of the key
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Staging value for [`PrimaryKey`].
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct PrimaryKeyBuilder {
    name: Option<String>,
    columns: Vec<String>,
}

impl PrimaryKeyBuilder {
    /// Sets the constraint name
    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Appends a key column
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Appends key columns in order
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Finishes the key. A key without columns does not exist, so this
    /// yields `None` rather than an empty entity.
    pub fn build(self) -> Option<PrimaryKey> {
        if self.columns.is_empty() {
            return None;
        }
        Some(PrimaryKey {
            name: self.name,
            columns: self.columns.into_boxed_slice(),
        })
    }
}

/// Referential action applied on update or delete of the referenced row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForeignKeyAction {
    /// Propagate the change
    Cascade,
    /// Set referencing columns to NULL
    SetNull,
    /// Set referencing columns to their defaults
    SetDefault,
    /// Reject the change immediately
    Restrict,
    /// Reject the change at constraint check time
    #[default]
    NoAction,
}

impl ForeignKeyAction {
    /// Maps a portable catalog rule code.
    ///
    /// Unrecognized codes fall back to `NoAction`; vendor code tables are
    /// treated as non-exhaustive.
    pub fn from_rule_code(code: i16) -> Self {
        match code {
            0 => Self::Cascade,
            1 => Self::Restrict,
            2 => Self::SetNull,
            4 => Self::SetDefault,
            _ => Self::NoAction,
        }
    }
}

impl std::fmt::Display for ForeignKeyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        };
        f.write_str(text)
    }
}

/// Foreign key. `columns` and `referenced_columns` are positionally aligned.
///
/// The referenced table is held by name only; resolving it is a lookup
/// against the owning [`Database`](super::Database).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    name: String,
    columns: Box<[String]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    referenced_schema: Option<String>,
    referenced_table: String,
    referenced_columns: Box<[String]>,
    on_update: ForeignKeyAction,
    on_delete: ForeignKeyAction,
}

impl ForeignKey {
    /// Starts a foreign key with the given name
    pub fn builder(name: impl Into<String>) -> ForeignKeyBuilder {
        ForeignKeyBuilder {
            name: name.into(),
            columns: Vec::new(),
            referenced_schema: None,
            referenced_table: String::new(),
            referenced_columns: Vec::new(),
            on_update: ForeignKeyAction::default(),
            on_delete: ForeignKeyAction::default(),
        }
    }

    /// Constraint name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Referencing columns
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Schema of the referenced table
    pub fn referenced_schema(&self) -> Option<&str> {
        self.referenced_schema.as_deref()
    }

    /// Referenced table name
    pub fn referenced_table(&self) -> &str {
        &self.referenced_table
    }

    /// Referenced columns, aligned with `columns`
    pub fn referenced_columns(&self) -> &[String] {
        &self.referenced_columns
    }

    /// Action on update of the referenced row
    pub fn on_update(&self) -> ForeignKeyAction {
        self.on_update
    }

    /// Action on delete of the referenced row
    pub fn on_delete(&self) -> ForeignKeyAction {
        self.on_delete
    }

    /// Local/referenced column pairs in key order.
    pub fn column_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .zip(self.referenced_columns.iter())
            .map(|(local, remote)| (local.as_str(), remote.as_str()))
    }
}

/// Staging value for [`ForeignKey`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ForeignKeyBuilder {
    name: String,
    columns: Vec<String>,
    referenced_schema: Option<String>,
    referenced_table: String,
    referenced_columns: Vec<String>,
    on_update: ForeignKeyAction,
    on_delete: ForeignKeyAction,
}

impl ForeignKeyBuilder {
    /// Sets the referenced schema
    pub fn referenced_schema(mut self, schema: Option<String>) -> Self {
        self.referenced_schema = schema;
        self
    }

    /// Sets the referenced table
    pub fn referenced_table(mut self, table: impl Into<String>) -> Self {
        self.referenced_table = table.into();
        self
    }

    /// Sets the update action
    pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.on_update = action;
        self
    }

    /// Sets the delete action
    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = action;
        self
    }

    /// Appends one local/referenced column pair.
    pub fn column_pair(mut self, local: impl Into<String>, referenced: impl Into<String>) -> Self {
        self.push_pair(local, referenced);
        self
    }

    pub(crate) fn push_pair(&mut self, local: impl Into<String>, referenced: impl Into<String>) {
        self.columns.push(local.into());
        self.referenced_columns.push(referenced.into());
    }

    /// Finishes the key
    pub fn build(self) -> ForeignKey {
        ForeignKey {
            name: self.name,
            columns: self.columns.into_boxed_slice(),
            referenced_schema: self.referenced_schema,
            referenced_table: self.referenced_table,
            referenced_columns: self.referenced_columns.into_boxed_slice(),
            on_update: self.on_update,
            on_delete: self.on_delete,
        }
    }
}
