//! Copy configuration: capability gates, table filters, and the loadable
//! parameter set the front-end hands to the reader and writer.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::schema::Table;
use crate::core::traits::Dialect;
use crate::dialects;
use crate::error::{Result, SchemaError};

/// Capability gates plus the dialect a reader or writer operates under.
///
/// Defaults: primary keys are copied, foreign keys and sequences are not,
/// and views are written as views when the target supports them.
#[derive(Clone)]
pub struct Configuration {
    copy_primary_keys: bool,
    copy_foreign_keys: bool,
    copy_sequences: bool,
    views_as_tables: bool,
    dialect: Arc<dyn Dialect>,
}

impl Configuration {
    /// Create a configuration with default gates.
    pub fn new(dialect: Arc<dyn Dialect>) -> Self {
        Self {
            copy_primary_keys: true,
            copy_foreign_keys: false,
            copy_sequences: false,
            views_as_tables: false,
            dialect,
        }
    }

    pub fn with_primary_keys(mut self, copy: bool) -> Self {
        self.copy_primary_keys = copy;
        self
    }

    pub fn with_foreign_keys(mut self, copy: bool) -> Self {
        self.copy_foreign_keys = copy;
        self
    }

    pub fn with_sequences(mut self, copy: bool) -> Self {
        self.copy_sequences = copy;
        self
    }

    pub fn with_views_as_tables(mut self, views_as_tables: bool) -> Self {
        self.views_as_tables = views_as_tables;
        self
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn copy_primary_keys(&self) -> bool {
        self.copy_primary_keys
    }

    pub fn copy_foreign_keys(&self) -> bool {
        self.copy_foreign_keys
    }

    pub fn copy_sequences(&self) -> bool {
        self.copy_sequences
    }

    pub fn views_as_tables(&self) -> bool {
        self.views_as_tables
    }

    /// Whether the reader should gather primary keys.
    pub fn supports_primary_keys(&self) -> bool {
        self.copy_primary_keys
    }

    /// Whether the reader should gather foreign keys.
    pub fn supports_foreign_keys(&self) -> bool {
        self.copy_foreign_keys
    }

    /// Whether the reader should gather unique keys and indices.
    pub fn supports_unique_keys(&self) -> bool {
        self.dialect.supports_unique()
    }

    /// Whether the reader should gather sequences: the gate must be on and
    /// the dialect must know how to read them.
    pub fn supports_sequences(&self) -> bool {
        self.copy_sequences && self.dialect.supports_sequences()
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("copy_primary_keys", &self.copy_primary_keys)
            .field("copy_foreign_keys", &self.copy_foreign_keys)
            .field("copy_sequences", &self.copy_sequences)
            .field("views_as_tables", &self.views_as_tables)
            .field("dialect", &self.dialect.name())
            .finish()
    }
}

/// Predicate deciding which tables of the source schema are read.
pub trait TableFilter {
    fn accept(&self, table: &Table) -> bool;
}

/// Filter accepting every table.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllTables;

impl TableFilter for AcceptAllTables {
    fn accept(&self, _table: &Table) -> bool {
        true
    }
}

/// Include/exclude filter over table names.
///
/// With both sets empty every table is accepted. An explicitly included
/// name is accepted, an explicitly excluded one rejected; any other table
/// is accepted only when nothing was explicitly included.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeExcludeFilter {
    included: HashSet<String>,
    excluded: HashSet<String>,
}

impl IncludeExcludeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(&mut self, table: impl Into<String>) {
        self.included.insert(table.into());
    }

    pub fn exclude(&mut self, table: impl Into<String>) {
        self.excluded.insert(table.into());
    }

    pub fn is_all_tables(&self) -> bool {
        self.included.is_empty() && self.excluded.is_empty()
    }

    fn should_read(&self, name: &str) -> bool {
        if self.is_all_tables() {
            true
        } else if self.included.contains(name) {
            true
        } else if self.excluded.contains(name) {
            false
        } else {
            // implicitly included when nothing is explicitly included
            self.included.is_empty()
        }
    }
}

impl TableFilter for IncludeExcludeFilter {
    fn accept(&self, table: &Table) -> bool {
        self.should_read(table.name())
    }
}

fn default_true() -> bool {
    true
}

/// Parameters for one side of a schema copy, loadable from YAML.
///
/// This is the front-end's hand-off format: a URI (which selects the
/// dialect), credentials for the external connection layer, the copy gates
/// and the table include/exclude lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaParams {
    /// JDBC-style URI; its prefix selects the dialect.
    pub uri: String,

    /// Username for the connecting layer.
    pub username: String,

    /// Password for the connecting layer.
    pub password: String,

    /// Schema to read, when the source scopes by schema.
    #[serde(default)]
    pub schema: Option<String>,

    /// Whether the dialect may query the database's own catalog views.
    #[serde(default = "default_true")]
    pub schema_info_accessible: bool,

    #[serde(default = "default_true")]
    pub copy_primary_keys: bool,

    #[serde(default)]
    pub copy_foreign_keys: bool,

    #[serde(default)]
    pub copy_sequences: bool,

    #[serde(default)]
    pub views_as_tables: bool,

    #[serde(default)]
    pub included_tables: HashSet<String>,

    #[serde(default)]
    pub excluded_tables: HashSet<String>,
}

impl SchemaParams {
    /// Load parameters from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: SchemaParams = serde_yaml::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<()> {
        if self.uri.is_empty() {
            return Err(SchemaError::Config("uri argument is required".to_string()));
        }
        if self.username.is_empty() {
            return Err(SchemaError::Config("username argument is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(SchemaError::Config("password argument is required".to_string()));
        }
        Ok(())
    }

    /// Resolve the dialect from the URI prefix. A fresh instance is
    /// created so the catalog-access toggle stays local to this copy.
    pub fn dialect(&self) -> Result<Box<dyn Dialect>> {
        dialects::dialect_for_uri_with(&self.uri, self.schema_info_accessible)
    }

    /// Build the reader/writer configuration these parameters describe.
    pub fn configuration(&self) -> Result<Configuration> {
        let dialect: Arc<dyn Dialect> = Arc::from(self.dialect()?);
        Ok(Configuration::new(dialect)
            .with_primary_keys(self.copy_primary_keys)
            .with_foreign_keys(self.copy_foreign_keys)
            .with_sequences(self.copy_sequences)
            .with_views_as_tables(self.views_as_tables))
    }

    /// Build the table filter these parameters describe.
    pub fn table_filter(&self) -> IncludeExcludeFilter {
        IncludeExcludeFilter {
            included: self.included_tables.clone(),
            excluded: self.excluded_tables.clone(),
        }
    }
}
