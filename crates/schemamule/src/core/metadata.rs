//! The data-source boundary: driver metadata surfaces and catalog queries.
//!
//! Connection acquisition, pooling and driver wiring live outside this
//! crate. The reader and the dialects consume a [`DataSource`], which is the
//! JDBC `DatabaseMetaData`-shaped contract a driver adapter must satisfy.
//!
//! Implementations must return fully materialized rows: every field of a
//! row is read before the cursor advances. Some drivers (Oracle notably)
//! hand out column defaults as character streams that close as soon as the
//! cursor moves, so a lazily-populated row would lose data.

use crate::core::schema::TableKind;
use crate::core::types::SqlType;
use crate::error::DataSourceError;

/// Result type for data-source operations. Failures are wrapped into
/// [`SchemaError::MetaDataAccess`](crate::error::SchemaError::MetaDataAccess)
/// by the callers in the dialect and reader layers.
pub type DataSourceResult<T> = std::result::Result<T, DataSourceError>;

/// One row of the driver's table listing.
#[derive(Debug, Clone)]
pub struct TableMeta {
    pub name: String,
    pub kind: TableKind,
}

/// One row of the driver's column listing.
#[derive(Debug, Clone)]
pub struct ColumnMeta {
    pub table: String,
    pub name: String,
    pub data_type: SqlType,
    pub size: i32,
    pub decimal_digits: i32,
    pub nullable: bool,
    /// Raw default-value text (`COLUMN_DEF`), unparsed.
    pub default_value: Option<String>,
}

/// One row of the driver's primary key listing.
#[derive(Debug, Clone)]
pub struct PrimaryKeyMeta {
    pub table: String,
    pub column: String,
    pub name: Option<String>,
}

/// One row of the driver's imported (foreign) key listing.
#[derive(Debug, Clone)]
pub struct ImportedKeyMeta {
    pub pk_table: String,
    pub pk_column: String,
    pub fk_column: String,
    pub name: Option<String>,
}

/// One row of the driver's index listing.
#[derive(Debug, Clone)]
pub struct IndexMeta {
    pub table: String,
    pub column: String,
    pub name: Option<String>,
    pub non_unique: bool,
}

/// A value in a generic catalog query result.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Long(i64),
    Bool(bool),
}

/// A named-column row from a generic catalog query.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Build a row. `columns` and `values` must have the same length.
    pub fn new(columns: Vec<String>, values: Vec<SqlValue>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Look up a value by column name. `None` when the column is absent.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }
}

/// A live source of schema metadata.
///
/// One reader invocation is expected to hold a single connection for its
/// duration; releasing it on every exit path is the implementation's
/// responsibility.
pub trait DataSource {
    /// Tables and views of the schema, in catalog order.
    fn tables(&self, schema: &str) -> DataSourceResult<Vec<TableMeta>>;

    /// Columns of one table, in ordinal order.
    fn columns(&self, schema: &str, table: &str) -> DataSourceResult<Vec<ColumnMeta>>;

    /// Primary key members of one table.
    fn primary_keys(&self, schema: &str, table: &str) -> DataSourceResult<Vec<PrimaryKeyMeta>>;

    /// Foreign keys imported by one table.
    fn imported_keys(&self, table: &str) -> DataSourceResult<Vec<ImportedKeyMeta>>;

    /// Index rows of one table; `unique_only` restricts to unique indices.
    fn index_info(&self, schema: &str, table: &str, unique_only: bool) -> DataSourceResult<Vec<IndexMeta>>;

    /// Execute a catalog query (Oracle dictionary views and the like) and
    /// return its fully materialized rows.
    fn query(&self, sql: &str) -> DataSourceResult<Vec<Row>>;
}
