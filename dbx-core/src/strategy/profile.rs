use std::borrow::Cow;

type Text = Cow<'static, str>;

/// How system-schema names are compared against the denylist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameCase {
    /// Names are lower-cased before comparison
    #[default]
    Insensitive,
    /// Names must match exactly
    Sensitive,
}

/// Which catalog level holds the user-visible schema namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaModel {
    /// Schemas live inside a catalog (PostgreSQL, SQL Server)
    #[default]
    Schemas,
    /// Each catalog is a schema (MySQL, MariaDB)
    Catalogs,
}

/// What happens when the vendor routine query fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcedureFailurePolicy {
    /// Retry through the portable routine listing
    #[default]
    FallbackToStandard,
    /// Record a warning and report no routines
    Warn,
}

/// Vendor catalog queries used to fill what the portable rows cannot.
///
/// Every query takes text parameters only. Relation-scoped queries bind
/// `(scope, relation)`, schema-scoped queries bind `(scope)`, and the
/// parameter query binds `(scope, routine)`. Result columns are read by
/// label:
///
/// | query               | labels                                                  |
/// |---------------------|---------------------------------------------------------|
/// | `table_comment`     | `comment`                                               |
/// | `column_comments`   | `column_name`, `comment`                                |
/// | `view_definition`   | `definition`                                            |
/// | `*_triggers`        | `trigger_name`, `table_name`, `timing`, `event`, `enabled`, `definition` |
/// | `procedures`        | `name`, `type`, `return_type`, `definition`, `comment`  |
/// | `procedure_parameters` | `parameter_name`, `data_type`, `mode`, `position`    |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorQueries {
    /// Comment of one table or view
    pub table_comment: Option<Text>,
    /// Comments of every column of one relation
    pub column_comments: Option<Text>,
    /// Source text of one view
    pub view_definition: Option<Text>,
    /// Every trigger in a schema
    pub schema_triggers: Option<Text>,
    /// Triggers defined on one table
    pub table_triggers: Option<Text>,
    /// Stored routines of a schema
    pub procedures: Option<Text>,
    /// Parameters of one routine
    pub procedure_parameters: Option<Text>,
}

/// Everything that distinguishes one vendor from another.
///
/// # Example
/// ```rust
/// use dbx_core::strategy::{NameCase, VendorProfile};
///
/// let profile = VendorProfile::new("Firebird")
///     .with_needles(["firebird"])
///     .with_system_schemas(["rdb$"], NameCase::Insensitive);
/// assert!(profile.matches("Firebird 4.0"));
/// assert!(!profile.should_include_schema("RDB$"));
/// assert!(profile.should_include_schema("sales"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorProfile {
    name: Text,
    needles: Vec<Text>,
    fallback: bool,
    system_schemas: Vec<Text>,
    name_case: NameCase,
    system_prefixes: Vec<Text>,
    schema_model: SchemaModel,
    queries: VendorQueries,
    procedure_failure: ProcedureFailurePolicy,
}

impl VendorProfile {
    /// Profile with no needles, filters or vendor queries
    pub fn new(name: impl Into<Text>) -> Self {
        Self {
            name: name.into(),
            needles: Vec::new(),
            fallback: false,
            system_schemas: Vec::new(),
            name_case: NameCase::default(),
            system_prefixes: Vec::new(),
            schema_model: SchemaModel::default(),
            queries: VendorQueries::default(),
            procedure_failure: ProcedureFailurePolicy::default(),
        }
    }

    /// Substrings that identify the vendor in a lower-cased product name.
    #[must_use]
    pub fn with_needles<I, S>(mut self, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Text>,
    {
        self.needles = needles
            .into_iter()
            .map(|n| Cow::Owned(n.into().to_lowercase()))
            .collect();
        self
    }

    /// Marks this profile as the catch-all that matches every product.
    #[must_use]
    pub fn as_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    /// Schema names that are never listed, compared under `name_case`
    #[must_use]
    pub fn with_system_schemas<I, S>(mut self, names: I, name_case: NameCase) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Text>,
    {
        self.system_schemas = names.into_iter().map(Into::into).collect();
        self.name_case = name_case;
        self
    }

    /// Case-sensitive name prefix marking a system schema
    #[must_use]
    pub fn with_system_prefix(mut self, prefix: impl Into<Text>) -> Self {
        self.system_prefixes.push(prefix.into());
        self
    }

    /// Sets whether listed names are schemas or catalogs
    #[must_use]
    pub fn with_schema_model(mut self, model: SchemaModel) -> Self {
        self.schema_model = model;
        self
    }

    /// Vendor catalog SQL
    #[must_use]
    pub fn with_queries(mut self, queries: VendorQueries) -> Self {
        self.queries = queries;
        self
    }

    /// What to do when the vendor routine query fails
    #[must_use]
    pub fn with_procedure_failure(mut self, policy: ProcedureFailurePolicy) -> Self {
        self.procedure_failure = policy;
        self
    }

    /// Vendor display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the catch-all profile
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Schema or catalog namespace model
    pub fn schema_model(&self) -> SchemaModel {
        self.schema_model
    }

    /// Vendor catalog SQL
    pub fn queries(&self) -> &VendorQueries {
        &self.queries
    }

    /// Routine query failure policy
    pub fn procedure_failure(&self) -> ProcedureFailurePolicy {
        self.procedure_failure
    }

    /// Whether the product name belongs to this vendor.
    pub fn matches(&self, product_name: &str) -> bool {
        if self.fallback {
            return true;
        }
        let product = product_name.to_lowercase();
        self.needles.iter().any(|needle| product.contains(needle.as_ref()))
    }

    /// Whether a schema holds user objects rather than system catalogs.
    pub fn should_include_schema(&self, schema_name: &str) -> bool {
        if schema_name.is_empty() {
            return false;
        }

        let candidate = match self.name_case {
            NameCase::Insensitive => Cow::Owned(schema_name.to_lowercase()),
            NameCase::Sensitive => Cow::Borrowed(schema_name),
        };

        let denied = self.system_schemas.iter().any(|system| match self.name_case {
            NameCase::Insensitive => system.to_lowercase() == *candidate,
            NameCase::Sensitive => system.as_ref() == candidate.as_ref(),
        });
        if denied {
            return false;
        }

        !self
            .system_prefixes
            .iter()
            .any(|prefix| schema_name.starts_with(prefix.as_ref()))
    }

    /// Catalog and schema qualifiers under which a listed schema's
    /// objects are found.
    pub fn qualifiers<'a>(&self, schema_name: &'a str) -> (Option<&'a str>, Option<&'a str>) {
        match self.schema_model {
            SchemaModel::Schemas => (None, Some(schema_name)),
            SchemaModel::Catalogs => (Some(schema_name), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needles_match_case_insensitively() {
        let profile = VendorProfile::new("MySQL").with_needles(["MySQL", "mariadb"]);
        assert!(profile.matches("MariaDB 10.11"));
        assert!(profile.matches("mysql"));
        assert!(!profile.matches("PostgreSQL 16.2"));
    }

    #[test]
    fn test_fallback_matches_everything() {
        let profile = VendorProfile::new("Generic").as_fallback();
        assert!(profile.matches("FooDB 1.0"));
        assert!(profile.matches(""));
    }

    #[test]
    fn test_sensitive_denylist_compares_exactly() {
        let profile = VendorProfile::new("X").with_system_schemas(["sys"], NameCase::Sensitive);
        assert!(!profile.should_include_schema("sys"));
        assert!(profile.should_include_schema("SYS"));
        assert!(!profile.should_include_schema(""));
    }

    #[test]
    fn test_qualifiers_follow_schema_model() {
        let schemas = VendorProfile::new("A");
        let catalogs = VendorProfile::new("B").with_schema_model(SchemaModel::Catalogs);
        assert_eq!(schemas.qualifiers("public"), (None, Some("public")));
        assert_eq!(catalogs.qualifiers("shop"), (Some("shop"), None));
    }
}
