//! Passive, database-agnostic schema model.
//!
//! The reader builds these types bottom-up (tables, then columns, keys,
//! indices and sequences); the writer consumes them read-only. Tables own
//! their columns; key and index membership is recorded by column name on
//! the owning table, and the derived column predicates (`is_primary_key`,
//! `is_unique`, ...) are computed on demand from the owner's state rather
//! than cached on the column.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::core::types::SqlType;
use crate::error::{Result, SchemaError};

/// Kind of a relation: a base table or a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    Table,
    View,
}

impl TableKind {
    /// The driver-level metadata name (`TABLE_TYPE` column).
    pub fn metadata_name(self) -> &'static str {
        match self {
            TableKind::Table => "TABLE",
            TableKind::View => "VIEW",
        }
    }

    /// Parse a `TABLE_TYPE` metadata value.
    pub fn from_metadata_name(name: &str) -> Option<TableKind> {
        match name {
            "TABLE" => Some(TableKind::Table),
            "VIEW" => Some(TableKind::View),
            _ => None,
        }
    }
}

/// A column default value.
///
/// `Now` is the distinguished "current timestamp at row insertion" marker;
/// dialects parse their own current-time tokens into it and render it back
/// out with their own token. Everything else is kept as the literal text the
/// catalog reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultValue {
    Now,
    Literal { value: String, is_string: bool },
}

impl DefaultValue {
    /// Create a literal default value.
    pub fn literal(value: impl Into<String>, is_string: bool) -> Self {
        DefaultValue::Literal {
            value: value.into(),
            is_string,
        }
    }

    /// Whether this is the distinguished current-timestamp marker.
    pub fn is_now(&self) -> bool {
        matches!(self, DefaultValue::Now)
    }
}

/// A foreign key stored on the referring column, naming the referenced
/// table and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Constraint name (`FK_NAME`), when the driver reports one.
    pub name: Option<String>,
    /// Referenced table name.
    pub table: String,
    /// Referenced column name, typically the primary key.
    pub column: String,
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Canonical SQL type code.
    pub data_type: SqlType,

    /// Column size (`COLUMN_SIZE`; digits of precision for numerics).
    pub size: i32,

    /// Decimal digits (`DECIMAL_DIGITS`).
    pub precision: i32,

    /// Whether the column allows NULL.
    pub nullable: bool,

    /// Parsed default value, if any.
    pub default_value: Option<DefaultValue>,

    /// Foreign key reference carried by this column, if any.
    pub reference: Option<Reference>,
}

impl Column {
    /// Create a column without default value or reference.
    pub fn new(name: impl Into<String>, data_type: SqlType, size: i32, precision: i32, nullable: bool) -> Self {
        Self::with_default(name, data_type, size, precision, nullable, None)
    }

    /// Create a column with a parsed default value.
    pub fn with_default(
        name: impl Into<String>,
        data_type: SqlType,
        size: i32,
        precision: i32,
        nullable: bool,
        default_value: Option<DefaultValue>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            size,
            precision,
            nullable,
            default_value,
            reference: None,
        }
    }
}

/// Primary key: an optional constraint name plus member column names.
///
/// Membership is recorded by name; the owning [`Table`] validates that every
/// named column actually exists when the key is attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKey {
    name: Option<String>,
    columns: Vec<String>,
}

impl PrimaryKey {
    /// Create an empty primary key.
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            columns: Vec::new(),
        }
    }

    /// Constraint name, when known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Member column names, in the order they were added.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Add a member column. Adding a name already present is a no-op.
    pub fn add_column(&mut self, column: impl Into<String>) {
        let column = column.into();
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }

    /// Whether the named column is a member.
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// An index over table columns, unique or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    name: Option<String>,
    unique: bool,
    columns: Vec<String>,
}

impl Index {
    /// Create an empty index.
    pub fn new(name: Option<String>, unique: bool) -> Self {
        Self {
            name,
            unique,
            columns: Vec::new(),
        }
    }

    /// Index name, when known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether this index enforces uniqueness.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Member column names, in index order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Add a member column. Adding a name already present is a no-op.
    pub fn add_column(&mut self, column: impl Into<String>) {
        let column = column.into();
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }

    /// Whether the named column is a member.
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// A database sequence. `value` is the next-value hint (Oracle
/// `LAST_NUMBER`), emitted as `START WITH` on the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    pub value: Option<i64>,
}

impl Sequence {
    pub fn new(name: impl Into<String>, value: Option<i64>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A table (or view) with its columns, primary key and indices.
///
/// Column order is stable and reflects discovery order. Equality and hash
/// are by name alone: table names are assumed unique within a schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    name: String,
    kind: TableKind,
    view_text: Option<String>,
    columns: Vec<Column>,
    primary_key: Option<PrimaryKey>,
    indices: Vec<Index>,
}

impl Table {
    /// Create a base table.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, TableKind::Table)
    }

    /// Create a table of the given kind, without view text.
    pub fn with_kind(name: impl Into<String>, kind: TableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            view_text: None,
            columns: Vec::new(),
            primary_key: None,
            indices: Vec::new(),
        }
    }

    /// Create a view with its defining SELECT.
    pub fn view(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TableKind::View,
            view_text: Some(text.into()),
            columns: Vec::new(),
            primary_key: None,
            indices: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// The defining SELECT, for views read from a catalog that exposes it.
    pub fn view_text(&self) -> Option<&str> {
        self.view_text.as_deref()
    }

    /// Columns in discovery order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Append a column. Order of addition is preserved.
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Find a column by exact name.
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Find a column by exact name, mutably.
    pub fn find_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Attach the primary key, verifying every member column exists.
    pub fn set_primary_key(&mut self, primary_key: PrimaryKey) -> Result<()> {
        for column in primary_key.columns() {
            if self.find_column(column).is_none() {
                return Err(SchemaError::invalid_model(format!(
                    "primary key column {} does not exist on table {}",
                    column, self.name
                )));
            }
        }
        self.primary_key = Some(primary_key);
        Ok(())
    }

    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    /// Indices in the order they were first seen.
    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    /// Record that `column` participates in the named index, creating the
    /// index on first sight. This is how the reader materializes unique
    /// keys and indices one metadata row at a time.
    ///
    /// The lookup here is by exact name so that distinct indices sharing a
    /// name prefix never merge; contrast [`Table::find_index`].
    pub fn add_index_column(&mut self, index_name: Option<&str>, unique: bool, column: &str) -> Result<()> {
        if self.find_column(column).is_none() {
            return Err(SchemaError::invalid_model(format!(
                "index column {} does not exist on table {}",
                column, self.name
            )));
        }
        let existing = self
            .indices
            .iter_mut()
            .find(|i| i.name.as_deref() == index_name);
        match existing {
            Some(index) => index.add_column(column),
            None => {
                let mut index = Index::new(index_name.map(str::to_string), unique);
                index.add_column(column);
                self.indices.push(index);
            }
        }
        Ok(())
    }

    /// Find the first index whose name starts with `name`.
    ///
    /// The prefix match is deliberate: engines decorate constraint names
    /// when materializing them as indices (HSQLDB reports `UK_FOO` as
    /// `SYS_IDX_UK_FOO_...`), so callers search by the stem. A name that is
    /// a prefix of another index's name can therefore match either.
    pub fn find_index(&self, name: &str) -> Option<&Index> {
        self.indices
            .iter()
            .find(|i| i.name().is_some_and(|n| n.starts_with(name)))
    }

    /// Remove an index by exact name.
    pub fn remove_index(&mut self, name: &str) {
        self.indices.retain(|i| i.name() != Some(name));
    }

    /// All indices the named column participates in.
    pub fn indices_for(&self, column: &str) -> Vec<&Index> {
        self.indices.iter().filter(|i| i.contains(column)).collect()
    }

    /// Drop single-column indices whose column is a primary key member.
    /// Drivers surface the primary key as a system-generated unique index;
    /// without this the key would reappear as a duplicate unique constraint.
    pub fn prune_redundant_primary_key_indices(&mut self) {
        let members: HashSet<String> = match &self.primary_key {
            Some(pk) => pk.columns().iter().cloned().collect(),
            None => return,
        };
        self.indices
            .retain(|i| !(i.columns().len() == 1 && members.contains(&i.columns()[0])));
    }

    /// Whether the named column belongs to the primary key.
    pub fn is_primary_key_member(&self, column: &str) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| pk.contains(column))
    }

    /// Whether the named column is the sole primary key column.
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| pk.columns().len() == 1 && pk.contains(column))
    }

    /// Whether the named column appears in at least one unique index.
    pub fn is_unique_key_member(&self, column: &str) -> bool {
        self.indices
            .iter()
            .any(|i| i.is_unique() && i.contains(column))
    }

    /// Whether the named column is by itself unique: it appears in a
    /// unique index of cardinality one.
    pub fn is_unique(&self, column: &str) -> bool {
        self.indices
            .iter()
            .any(|i| i.is_unique() && i.columns().len() == 1 && i.contains(column))
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Table {}

impl Hash for Table {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A schema: ordered tables plus ordered sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    tables: Vec<Table>,
    sequences: Vec<Sequence>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
            sequences: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tables in the order they were read.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut [Table] {
        &mut self.tables
    }

    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Find the first table with the given name.
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn find_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name() == name)
    }

    /// Sequences in the order they were read.
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn add_sequence(&mut self, sequence: Sequence) {
        self.sequences.push(sequence);
    }
}
