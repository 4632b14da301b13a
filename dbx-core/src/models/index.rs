use serde::{Deserialize, Serialize};

/// Physical organization of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexType {
    /// Balanced tree
    Btree,
    /// Hashed
    Hash,
    /// Full-text search
    Fulltext,
    /// Spatial (R-tree or similar)
    Spatial,
    /// Clustered; rows stored in key order
    Clustered,
    /// Nonclustered (SQL Server)
    Nonclustered,
    /// Anything not recognized
    #[default]
    Other,
}

impl IndexType {
    /// Maps a portable index type code: 1 clustered, 2 hashed, 3 "other"
    /// (how most drivers report ordinary b-tree indexes). Any other code,
    /// including the statistic marker 0, lands in `Other`.
    pub fn from_type_code(code: i16) -> Self {
        match code {
            1 => Self::Clustered,
            2 => Self::Hash,
            3 => Self::Btree,
            _ => Self::Other,
        }
    }
}

/// Sort order of one index column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
    /// Not reported by the driver
    #[default]
    Unknown,
}

impl SortOrder {
    /// Maps the catalog `A`/`D` marker; anything else, including a missing
    /// marker, is unknown.
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            Some(m) if m.eq_ignore_ascii_case("D") => Self::Desc,
            Some(m) if m.eq_ignore_ascii_case("A") => Self::Asc,
            _ => Self::Unknown,
        }
    }
}

/// One column entry of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    /// Indexed column
    pub name: String,
    /// Sort direction
    pub sort_order: SortOrder,
    /// 1-based position within the index key
    pub position: u32,
}

/// Index on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    name: String,
    columns: Box<[IndexColumn]>,
    unique: bool,
    index_type: IndexType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter_condition: Option<String>,
}

impl Index {
    /// Starts an index with the given name
    pub fn builder(name: impl Into<String>) -> IndexBuilder {
        IndexBuilder {
            name: name.into(),
            columns: Vec::new(),
            unique: false,
            index_type: IndexType::default(),
            filter_condition: None,
        }
    }

    /// Index name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key columns in key order
    pub fn columns(&self) -> &[IndexColumn] {
        &self.columns
    }

    /// Whether keys must be unique
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Physical organization
    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// Predicate of a partial index.
    pub fn filter_condition(&self) -> Option<&str> {
        self.filter_condition.as_deref()
    }
}

/// Staging value for [`Index`].
#[derive(Debug, Clone)]
#[must_use]
pub struct IndexBuilder {
    name: String,
    columns: Vec<IndexColumn>,
    unique: bool,
    index_type: IndexType,
    filter_condition: Option<String>,
}

impl IndexBuilder {
    /// Sets uniqueness
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Sets the physical organization
    pub fn index_type(mut self, index_type: IndexType) -> Self {
        self.index_type = index_type;
        self
    }

    /// Sets the partial-index predicate
    pub fn filter_condition(mut self, condition: Option<String>) -> Self {
        self.filter_condition = condition;
        self
    }

    /// Appends a key column
    pub fn column(mut self, name: impl Into<String>, sort_order: SortOrder, position: u32) -> Self {
        self.push_column(name, sort_order, position);
        self
    }

    pub(crate) fn push_column(&mut self, name: impl Into<String>, sort_order: SortOrder, position: u32) {
        self.columns.push(IndexColumn {
            name: name.into(),
            sort_order,
            position,
        });
    }

    /// Finishes the index
    pub fn build(self) -> Index {
        Index {
            name: self.name,
            columns: self.columns.into_boxed_slice(),
            unique: self.unique,
            index_type: self.index_type,
            filter_condition: self.filter_condition,
        }
    }
}
