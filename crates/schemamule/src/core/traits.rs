//! The dialect strategy trait and the spec intermediates it produces.
//!
//! A [`Dialect`] bundles everything specific to one database product: its
//! type-name vocabulary, default-value syntax, identity and sequence DDL
//! fragments, and its metadata-access strategy. Default method bodies carry
//! the baseline (driver-metadata) behavior so concrete dialects override
//! only what differs.

use std::collections::HashMap;

use crate::core::metadata::DataSource;
use crate::core::schema::{Column, DefaultValue, PrimaryKey, Sequence, Table, TableKind};
use crate::core::types::SqlType;
use crate::error::{Result, SchemaError};

/// An accepted-or-not table row, before the model table is built.
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub name: String,
    pub kind: TableKind,
    /// Defining SELECT for views, when the catalog exposes it.
    pub view_text: Option<String>,
}

impl TableSpec {
    /// Spec for a base table.
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TableKind::Table,
            view_text: None,
        }
    }

    /// Spec for a view with its defining SELECT.
    pub fn view(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TableKind::View,
            view_text: Some(text.into()),
        }
    }

    /// Spec of the given kind without view text (driver metadata path).
    pub fn with_kind(name: impl Into<String>, kind: TableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            view_text: None,
        }
    }

    /// Build the model table this spec describes.
    pub fn to_table(&self) -> Table {
        match (self.kind, &self.view_text) {
            (TableKind::View, Some(text)) => Table::view(self.name.clone(), text.clone()),
            (kind, _) => Table::with_kind(self.name.clone(), kind),
        }
    }
}

/// A decoded column together with the table it belongs to.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub table: String,
    pub column: Column,
}

/// A primary key gathered from per-column metadata rows.
#[derive(Debug, Clone)]
pub struct PrimaryKeySpec {
    pub table: String,
    pub name: Option<String>,
    pub columns: Vec<String>,
}

impl PrimaryKeySpec {
    pub fn new(table: impl Into<String>, name: Option<String>) -> Self {
        Self {
            table: table.into(),
            name,
            columns: Vec::new(),
        }
    }

    pub fn add_column(&mut self, column: impl Into<String>) {
        self.columns.push(column.into());
    }

    /// Construct the key and attach it to `table`, validating that every
    /// member column exists there.
    pub fn apply_to(&self, table: &mut Table) -> Result<()> {
        let mut key = PrimaryKey::new(self.name.clone());
        for column in &self.columns {
            key.add_column(column.clone());
        }
        table.set_primary_key(key)
    }
}

/// One index/unique-key metadata row: a single column's membership.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    pub table: String,
    pub column: String,
    pub name: Option<String>,
    pub unique: bool,
}

/// SQL-product strategy: type mapping, default-value policy, capability
/// flags, DDL fragments and metadata readers.
///
/// Instances are stateless apart from construction-time toggles and are
/// safe to share across reads; the URI registry hands out a fresh instance
/// per copy so per-run toggles never leak between runs.
pub trait Dialect: Send + Sync + std::fmt::Debug {
    /// Dialect identifier ("generic", "oracle", "hsqldb").
    fn name(&self) -> &'static str;

    // ===== Capability flags =====

    fn supports_unique(&self) -> bool {
        true
    }

    fn supports_identity_columns(&self) -> bool {
        false
    }

    fn supports_views(&self) -> bool {
        false
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    // ===== Type mapping =====

    /// Map a dialect-local type name to its canonical code.
    fn type_code(&self, name: &str) -> Result<SqlType>;

    /// Map a canonical code back to this dialect's type name.
    fn type_name(&self, code: SqlType) -> Result<&'static str>;

    /// Context-sensitive type name for a column. The baseline ignores the
    /// context and renders the declared code; target dialects override this
    /// with their translation rules.
    fn column_type_name(&self, table: &Table, column: &Column) -> Result<&'static str> {
        let _ = table;
        self.type_name(column.data_type)
    }

    /// Rendered size for a column. The baseline reports the declared size.
    fn column_size(&self, column: &Column) -> i32 {
        column.size
    }

    // ===== Default values =====

    /// Parse a raw `COLUMN_DEF` literal into a model default value.
    fn parse_default_value(&self, literal: Option<&str>, code: SqlType) -> Option<DefaultValue> {
        literal.map(|value| DefaultValue::literal(value, code.is_string()))
    }

    /// Render a column's default value in this dialect's syntax. `None`
    /// when the column has no default, or when the dialect has no token for
    /// the distinguished current-timestamp value.
    fn format_default_value(&self, column: &Column) -> Option<String> {
        match column.default_value.as_ref()? {
            DefaultValue::Literal { value, .. } => Some(value.clone()),
            DefaultValue::Now => None,
        }
    }

    // ===== SQL fragments =====

    /// Token(s) appended to an identity column declaration.
    fn identity_column_string(&self) -> Result<&'static str> {
        Err(SchemaError::unsupported(self.name(), "identity columns"))
    }

    /// JDBC driver class the front-end loads for this dialect.
    fn driver_class_name(&self) -> Result<&'static str> {
        Err(SchemaError::unsupported(self.name(), "driver class name"))
    }

    /// Statement executed against the target during teardown, if any.
    fn shutdown_sql(&self) -> Option<&'static str> {
        None
    }

    /// Expression yielding the next value of a sequence.
    fn next_sequence_value_sql(&self, sequence: &str) -> Result<String> {
        let _ = sequence;
        Err(SchemaError::unsupported(self.name(), "sequences"))
    }

    // ===== Metadata readers =====

    /// Tables and views of the schema, in catalog order.
    fn get_tables(&self, ds: &dyn DataSource, schema: &str) -> Result<Vec<TableSpec>>;

    /// Columns for the given table specs, in discovery order.
    fn get_columns(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<ColumnSpec>>;

    /// Primary keys keyed by table name.
    fn get_primary_keys(
        &self,
        ds: &dyn DataSource,
        schema: &str,
        tables: &[TableSpec],
    ) -> Result<HashMap<String, PrimaryKeySpec>>;

    /// Unique-key rows only.
    fn get_unique_keys(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<IndexSpec>>;

    /// Every index row, unique or not, with its unique flag.
    fn get_indices(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<IndexSpec>>;

    /// Sequences of the schema. The baseline reports none.
    fn get_sequences(&self, ds: &dyn DataSource, schema: &str) -> Result<Vec<Sequence>> {
        let _ = (ds, schema);
        Ok(Vec::new())
    }
}
