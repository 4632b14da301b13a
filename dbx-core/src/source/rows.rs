use crate::models::TableType;
use serde::{Deserialize, Serialize};

/// Portable catalog code values.
pub mod codes {
    /// Foreign-key rule: cascade
    pub const IMPORTED_KEY_CASCADE: i16 = 0;
    /// Foreign-key rule: restrict
    pub const IMPORTED_KEY_RESTRICT: i16 = 1;
    /// Foreign-key rule: set null
    pub const IMPORTED_KEY_SET_NULL: i16 = 2;
    /// Foreign-key rule: no action
    pub const IMPORTED_KEY_NO_ACTION: i16 = 3;
    /// Foreign-key rule: set default
    pub const IMPORTED_KEY_SET_DEFAULT: i16 = 4;

    /// Index row describing table statistics rather than an index
    pub const TABLE_INDEX_STATISTIC: i16 = 0;
    /// Clustered index
    pub const TABLE_INDEX_CLUSTERED: i16 = 1;
    /// Hashed index
    pub const TABLE_INDEX_HASHED: i16 = 2;
    /// Any other index
    pub const TABLE_INDEX_OTHER: i16 = 3;

    /// Routine result kind unknown
    pub const PROCEDURE_RESULT_UNKNOWN: i16 = 0;
    /// Routine returns no result
    pub const PROCEDURE_NO_RESULT: i16 = 1;
    /// Routine returns a result
    pub const PROCEDURE_RETURNS_RESULT: i16 = 2;

    /// Parameter kind unknown
    pub const PROCEDURE_COLUMN_UNKNOWN: i16 = 0;
    /// Input parameter
    pub const PROCEDURE_COLUMN_IN: i16 = 1;
    /// Input/output parameter
    pub const PROCEDURE_COLUMN_INOUT: i16 = 2;
    /// Result-set column
    pub const PROCEDURE_COLUMN_RESULT: i16 = 3;
    /// Output parameter
    pub const PROCEDURE_COLUMN_OUT: i16 = 4;
    /// Return value
    pub const PROCEDURE_COLUMN_RETURN: i16 = 5;
}

/// Server and driver identity reported by a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Server product name, matched against strategy needles
    pub product_name: String,
    /// Server version string
    pub product_version: String,
    /// Client driver name
    pub driver_name: String,
    /// Client driver version
    pub driver_version: String,
    /// Endpoint with credentials redacted
    pub url: Option<String>,
    /// Login the source is connected as
    pub user_name: Option<String>,
}

/// Qualified name of a relation or routine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectName {
    /// Catalog qualifier
    pub catalog: Option<String>,
    /// Schema qualifier
    pub schema: Option<String>,
    /// Object name
    pub name: String,
}

impl ObjectName {
    /// Qualified name from borrowed parts
    pub fn new(catalog: Option<&str>, schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            catalog: catalog.map(str::to_string),
            schema: schema.map(str::to_string),
            name: name.into(),
        }
    }

    /// Innermost qualifier: the schema, or the catalog when there is none.
    pub fn scope(&self) -> Option<&str> {
        self.schema.as_deref().or(self.catalog.as_deref())
    }
}

impl std::fmt::Display for ObjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.scope() {
            Some(scope) => write!(f, "{}.{}", scope, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// One listed schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRow {
    /// Schema name
    pub schema_name: String,
    /// Owning catalog
    pub catalog: Option<String>,
}

/// One listed table or view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Owning catalog
    pub catalog: Option<String>,
    /// Owning schema
    pub schema: Option<String>,
    /// Relation name
    pub name: String,
    /// Relation kind
    pub kind: TableType,
    /// Catalog comment
    pub remarks: Option<String>,
}

impl TableRow {
    /// Qualified name of the relation
    pub fn object_name(&self) -> ObjectName {
        ObjectName {
            catalog: self.catalog.clone(),
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }
}

/// One column of a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    /// Column name
    pub column_name: String,
    /// Vendor type name
    pub type_name: String,
    /// Display size or character length
    pub column_size: Option<i32>,
    /// Scale
    pub decimal_digits: Option<i32>,
    /// `YES`, `NO` or empty when unknown
    pub is_nullable: Option<String>,
    /// 1-based position
    pub ordinal_position: i32,
    /// Default expression
    pub column_default: Option<String>,
    /// `YES`/`NO`; absent on drivers that do not report it
    pub is_autoincrement: Option<String>,
    /// Column comment
    pub remarks: Option<String>,
}

impl ColumnRow {
    /// A nullable column with no size, default or comment.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, ordinal: i32) -> Self {
        Self {
            column_name: name.into(),
            type_name: type_name.into(),
            column_size: None,
            decimal_digits: None,
            is_nullable: Some("YES".to_string()),
            ordinal_position: ordinal,
            column_default: None,
            is_autoincrement: None,
            remarks: None,
        }
    }
}

/// One column of a primary key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyRow {
    /// Constraint name
    pub pk_name: Option<String>,
    /// Key column
    pub column_name: String,
    /// 1-based position in the key
    pub key_seq: i16,
}

impl PrimaryKeyRow {
    /// Key row for one column
    pub fn new(pk_name: Option<&str>, column_name: impl Into<String>, key_seq: i16) -> Self {
        Self {
            pk_name: pk_name.map(str::to_string),
            column_name: column_name.into(),
            key_seq,
        }
    }
}

/// One column pair of an imported foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedKeyRow {
    /// Constraint name, if reported
    pub fk_name: Option<String>,
    /// Referencing column
    pub fk_column_name: String,
    /// Schema of the referenced table
    pub pk_table_schema: Option<String>,
    /// Referenced table
    pub pk_table_name: String,
    /// Referenced column
    pub pk_column_name: String,
    /// 1-based position in the key
    pub key_seq: i16,
    /// Update rule code, see [`codes`]
    pub update_rule: i16,
    /// Delete rule code, see [`codes`]
    pub delete_rule: i16,
}

impl ImportedKeyRow {
    /// A pair with `NO ACTION` rules and no referenced schema.
    pub fn new(
        fk_name: Option<&str>,
        fk_column_name: impl Into<String>,
        pk_table_name: impl Into<String>,
        pk_column_name: impl Into<String>,
        key_seq: i16,
    ) -> Self {
        Self {
            fk_name: fk_name.map(str::to_string),
            fk_column_name: fk_column_name.into(),
            pk_table_schema: None,
            pk_table_name: pk_table_name.into(),
            pk_column_name: pk_column_name.into(),
            key_seq,
            update_rule: codes::IMPORTED_KEY_NO_ACTION,
            delete_rule: codes::IMPORTED_KEY_NO_ACTION,
        }
    }
}

/// One column entry of an index, or a statistics row when `index_name`
/// is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfoRow {
    /// Index name; absent on statistics rows
    pub index_name: Option<String>,
    /// Whether duplicate keys are allowed
    pub non_unique: bool,
    /// Index type code, see [`codes`]
    pub index_type: i16,
    /// Key column, if any
    pub column_name: Option<String>,
    /// `A`, `D` or absent
    pub asc_or_desc: Option<String>,
    /// 1-based position in the key
    pub ordinal_position: i16,
    /// Partial-index predicate
    pub filter_condition: Option<String>,
}

impl IndexInfoRow {
    /// A non-unique ascending entry of an ordinary index.
    pub fn new(index_name: Option<&str>, column_name: Option<&str>, ordinal_position: i16) -> Self {
        Self {
            index_name: index_name.map(str::to_string),
            non_unique: true,
            index_type: codes::TABLE_INDEX_OTHER,
            column_name: column_name.map(str::to_string),
            asc_or_desc: Some("A".to_string()),
            ordinal_position,
            filter_condition: None,
        }
    }
}

/// One listed stored routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureRow {
    /// Routine name
    pub procedure_name: String,
    /// Result kind code, see [`codes`]
    pub procedure_type: i16,
    /// Routine comment
    pub remarks: Option<String>,
}

impl ProcedureRow {
    /// Routine row without a comment
    pub fn new(name: impl Into<String>, procedure_type: i16) -> Self {
        Self {
            procedure_name: name.into(),
            procedure_type,
            remarks: None,
        }
    }
}

/// One parameter or result column of a routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureColumnRow {
    /// Parameter name, if any
    pub column_name: Option<String>,
    /// Vendor type name
    pub type_name: Option<String>,
    /// Parameter kind code, see [`codes`]
    pub column_type: i16,
    /// Position; 0 for the return value
    pub ordinal_position: i32,
}

impl ProcedureColumnRow {
    /// Parameter row from borrowed parts
    pub fn new(
        name: Option<&str>,
        type_name: Option<&str>,
        column_type: i16,
        ordinal_position: i32,
    ) -> Self {
        Self {
            column_name: name.map(str::to_string),
            type_name: type_name.map(str::to_string),
            column_type,
            ordinal_position,
        }
    }
}

/// Dynamically typed cell of a vendor query result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SqlValue {
    /// SQL NULL
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Any integer
    Int(i64),
    /// Text or anything rendered as text
    Text(String),
}

impl SqlValue {
    /// Whether this is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text rendering; integers and booleans are formatted.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }

    /// Integer value; numeric text is parsed
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null => None,
        }
    }

    /// Truth value; accepts the usual catalog spellings of true.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            Self::Text(s) => Some(matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "t" | "true" | "y" | "yes" | "1" | "on"
            )),
            Self::Null => None,
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i16> for SqlValue {
    fn from(value: i16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One row of a vendor query, addressed by column label.
///
/// Label lookup ignores ASCII case, since vendors differ in how they fold
/// unquoted aliases.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryRow {
    cells: Vec<(String, SqlValue)>,
}

impl QueryRow {
    /// Empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell; chainable for building fixtures.
    #[must_use]
    pub fn with(mut self, label: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(label, value);
        self
    }

    /// Appends a cell
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<SqlValue>) {
        self.cells.push((label.into(), value.into()));
    }

    /// Cell by label, ignoring ASCII case
    pub fn get(&self, label: &str) -> Option<&SqlValue> {
        self.cells
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .map(|(_, value)| value)
    }

    /// Text of a cell; absent and NULL cells read as `None`.
    pub fn text(&self, label: &str) -> Option<String> {
        self.get(label).and_then(SqlValue::to_text)
    }

    /// Integer value of a cell
    pub fn int(&self, label: &str) -> Option<i64> {
        self.get(label).and_then(SqlValue::as_i64)
    }

    /// Truth value of a cell
    pub fn flag(&self, label: &str) -> Option<bool> {
        self.get(label).and_then(SqlValue::as_bool)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
