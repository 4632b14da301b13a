use super::{Procedure, Table, View};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A schema (or catalog, for vendors that model databases as catalogs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    catalog: Option<String>,
    tables: Box<[Table]>,
    views: Box<[View]>,
    procedures: Box<[Procedure]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
}

impl Schema {
    /// Starts a schema with the given name
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            catalog: None,
            tables: Vec::new(),
            views: Vec::new(),
            procedures: Vec::new(),
            owner: None,
        }
    }

    /// Schema name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning catalog, when the vendor reports one
    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    /// Base tables in catalog order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Views in catalog order
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Stored routines sorted by name
    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    /// Owning role
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Table with this exact name
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// View with this exact name
    pub fn find_view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name() == name)
    }

    /// Routine with this exact name
    pub fn find_procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name() == name)
    }
}

/// Staging value for [`Schema`].
#[derive(Debug, Clone)]
#[must_use]
pub struct SchemaBuilder {
    name: String,
    catalog: Option<String>,
    tables: Vec<Table>,
    views: Vec<View>,
    procedures: Vec<Procedure>,
    owner: Option<String>,
}

impl SchemaBuilder {
    /// Sets the owning catalog
    pub fn catalog(mut self, catalog: Option<String>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sets the owning role
    pub fn owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner;
        self
    }

    /// Appends a table
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Appends tables
    pub fn tables(mut self, tables: impl IntoIterator<Item = Table>) -> Self {
        self.tables.extend(tables);
        self
    }

    /// Appends a view
    pub fn view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    /// Appends views
    pub fn views(mut self, views: impl IntoIterator<Item = View>) -> Self {
        self.views.extend(views);
        self
    }

    /// Appends routines
    pub fn procedures(mut self, procedures: impl IntoIterator<Item = Procedure>) -> Self {
        self.procedures.extend(procedures);
        self
    }

    pub(crate) fn push_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub(crate) fn push_view(&mut self, view: View) {
        self.views.push(view);
    }

    /// Finishes the schema
    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            catalog: self.catalog,
            tables: self.tables.into_boxed_slice(),
            views: self.views.into_boxed_slice(),
            procedures: self.procedures.into_boxed_slice(),
            owner: self.owner,
        }
    }
}

/// Root of one exploration: server identity, schemas and the warnings
/// collected along the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    product_name: String,
    product_version: String,
    driver_name: String,
    driver_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_name: Option<String>,
    schemas: Box<[Schema]>,
    warnings: Box<[String]>,
    extracted_at: DateTime<Utc>,
}

impl Database {
    /// Starts an empty database
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder {
            product_name: String::new(),
            product_version: String::new(),
            driver_name: String::new(),
            driver_version: String::new(),
            url: None,
            user_name: None,
            schemas: Vec::new(),
            warnings: Vec::new(),
            extracted_at: None,
        }
    }

    /// Product name reported by the server
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Product version reported by the server
    pub fn product_version(&self) -> &str {
        &self.product_version
    }

    /// Name of the client driver
    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    /// Version of the client driver
    pub fn driver_version(&self) -> &str {
        &self.driver_version
    }

    /// Connection endpoint with credentials redacted.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Login the metadata was read as
    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// User schemas in ascending name order
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    /// Non-fatal gaps recorded during extraction.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// When the exploration finished
    pub fn extracted_at(&self) -> DateTime<Utc> {
        self.extracted_at
    }

    /// Schema with this exact name
    pub fn find_schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name() == name)
    }

    /// Tables across every schema
    pub fn total_table_count(&self) -> usize {
        self.schemas.iter().map(|s| s.tables().len()).sum()
    }

    /// Views across every schema
    pub fn total_view_count(&self) -> usize {
        self.schemas.iter().map(|s| s.views().len()).sum()
    }

    /// Routines across every schema
    pub fn total_procedure_count(&self) -> usize {
        self.schemas.iter().map(|s| s.procedures().len()).sum()
    }

    /// Copies the identity fields (not schemas or warnings) into a builder.
    pub(crate) fn identity_builder(&self) -> DatabaseBuilder {
        Self::builder()
            .product_name(self.product_name.clone())
            .product_version(self.product_version.clone())
            .driver_name(self.driver_name.clone())
            .driver_version(self.driver_version.clone())
            .url(self.url.clone())
            .user_name(self.user_name.clone())
            .extracted_at(self.extracted_at)
    }
}

/// Staging value for [`Database`].
#[derive(Debug, Clone)]
#[must_use]
pub struct DatabaseBuilder {
    product_name: String,
    product_version: String,
    driver_name: String,
    driver_version: String,
    url: Option<String>,
    user_name: Option<String>,
    schemas: Vec<Schema>,
    warnings: Vec<String>,
    extracted_at: Option<DateTime<Utc>>,
}

impl DatabaseBuilder {
    /// Sets the product name
    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    /// Sets the product version
    pub fn product_version(mut self, version: impl Into<String>) -> Self {
        self.product_version = version.into();
        self
    }

    /// Sets the driver name
    pub fn driver_name(mut self, name: impl Into<String>) -> Self {
        self.driver_name = name.into();
        self
    }

    /// Sets the driver version
    pub fn driver_version(mut self, version: impl Into<String>) -> Self {
        self.driver_version = version.into();
        self
    }

    /// Sets the endpoint; callers pass it already redacted
    pub fn url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    /// Sets the login name
    pub fn user_name(mut self, user_name: Option<String>) -> Self {
        self.user_name = user_name;
        self
    }

    /// Appends a schema
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Appends schemas
    pub fn schemas(mut self, schemas: impl IntoIterator<Item = Schema>) -> Self {
        self.schemas.extend(schemas);
        self
    }

    pub(crate) fn push_schema(&mut self, schema: Schema) {
        self.schemas.push(schema);
    }

    /// Appends recorded warnings
    pub fn warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Pins the extraction timestamp; defaults to the build time.
    pub fn extracted_at(mut self, at: DateTime<Utc>) -> Self {
        self.extracted_at = Some(at);
        self
    }

    /// Finishes the database, stamping the current time if none was pinned
    pub fn build(self) -> Database {
        Database {
            product_name: self.product_name,
            product_version: self.product_version,
            driver_name: self.driver_name,
            driver_version: self.driver_version,
            url: self.url,
            user_name: self.user_name,
            schemas: self.schemas.into_boxed_slice(),
            warnings: self.warnings.into_boxed_slice(),
            extracted_at: self.extracted_at.unwrap_or_else(Utc::now),
        }
    }
}
