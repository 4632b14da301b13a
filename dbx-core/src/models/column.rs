use serde::{Deserialize, Serialize};

/// A column of a table or view.
///
/// Immutable once built. Late-discovered facts (primary-key membership,
/// vendor comments) are applied by rebuilding through [`Column::to_builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data_type: String,
    size: i32,
    precision: i32,
    scale: i32,
    nullable: bool,
    primary_key: bool,
    auto_increment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    ordinal_position: u32,
}

impl Column {
    /// Starts a column with the given name.
    pub fn builder(name: impl Into<String>) -> ColumnBuilder {
        ColumnBuilder {
            name: name.into(),
            data_type: String::new(),
            size: 0,
            precision: 0,
            scale: 0,
            nullable: true,
            primary_key: false,
            auto_increment: false,
            default_value: None,
            comment: None,
            ordinal_position: 0,
        }
    }

    /// Copies every field into a fresh builder.
    pub fn to_builder(&self) -> ColumnBuilder {
        ColumnBuilder {
            name: self.name.clone(),
            data_type: self.data_type.clone(),
            size: self.size,
            precision: self.precision,
            scale: self.scale,
            nullable: self.nullable,
            primary_key: self.primary_key,
            auto_increment: self.auto_increment,
            default_value: self.default_value.clone(),
            comment: self.comment.clone(),
            ordinal_position: self.ordinal_position,
        }
    }

    /// Column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type name as reported by the vendor.
    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    /// Display size or character length; 0 when not reported
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Numeric precision; 0 when not applicable
    pub fn precision(&self) -> i32 {
        self.precision
    }

    /// Digits after the decimal point
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Whether NULL is allowed
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether the column belongs to the primary key
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Whether values are generated; false when the driver does not say
    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    /// Default expression text
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Column comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// True when the column carries a non-empty comment.
    pub fn has_comment(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// 1-based declaration order within the owning table.
    pub fn ordinal_position(&self) -> u32 {
        self.ordinal_position
    }
}

/// Staging value for [`Column`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ColumnBuilder {
    name: String,
    data_type: String,
    size: i32,
    precision: i32,
    scale: i32,
    nullable: bool,
    primary_key: bool,
    auto_increment: bool,
    default_value: Option<String>,
    comment: Option<String>,
    ordinal_position: u32,
}

impl ColumnBuilder {
    /// Sets the vendor type name
    pub fn data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    /// Sets the display size
    pub fn size(mut self, size: i32) -> Self {
        self.size = size;
        self
    }

    /// Sets the numeric precision
    pub fn precision(mut self, precision: i32) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the numeric scale
    pub fn scale(mut self, scale: i32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets nullability
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Marks primary-key membership
    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Marks generated values
    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    /// Sets the default expression
    pub fn default_value(mut self, default_value: Option<String>) -> Self {
        self.default_value = default_value;
        self
    }

    /// Sets the comment
    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// Sets the 1-based position
    pub fn ordinal_position(mut self, ordinal_position: u32) -> Self {
        self.ordinal_position = ordinal_position;
        self
    }

    /// Finishes the column
    pub fn build(self) -> Column {
        Column {
            name: self.name,
            data_type: self.data_type,
            size: self.size,
            precision: self.precision,
            scale: self.scale,
            nullable: self.nullable,
            primary_key: self.primary_key,
            auto_increment: self.auto_increment,
            default_value: self.default_value,
            comment: self.comment,
            ordinal_position: self.ordinal_position,
        }
    }
}
