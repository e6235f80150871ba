//! Error types for schema reading and writing.

use thiserror::Error;

use crate::core::types::SqlType;

/// Boxed error produced by a [`DataSource`](crate::core::metadata::DataSource)
/// implementation. The core never inspects these beyond chaining them as the
/// cause of a [`SchemaError::MetaDataAccess`].
pub type DataSourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for schema copy operations.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Configuration error (invalid YAML values, missing fields, etc.)
    #[error("configuration error: {0}")]
    Config(String),

    /// A type name the dialect does not recognize.
    #[error("no registered type for name {name}")]
    UnknownTypeName { name: String },

    /// A type code the dialect cannot render.
    #[error("no registered type {code}")]
    UnknownTypeCode { code: SqlType },

    /// Column decoding failed; carries the table and column for context.
    #[error("problems with column {column} from table {table}")]
    ColumnDecode {
        table: String,
        column: String,
        #[source]
        source: Box<SchemaError>,
    },

    /// URI does not match any registered dialect prefix.
    #[error("dialect not supported: {prefix}")]
    UnsupportedDialect { prefix: String },

    /// Attempt to emit DDL the dialect cannot support.
    #[error("{dialect} dialect does not support {operation}")]
    ViolatedCapability {
        dialect: &'static str,
        operation: &'static str,
    },

    /// Programming error in model construction (absent columns, unnamed
    /// objects where a name is required, and the like).
    #[error("invalid schema model: {0}")]
    InvalidModel(String),

    /// Underlying driver failure while reading metadata.
    #[error("could not read metadata: {context}")]
    MetaDataAccess {
        context: String,
        #[source]
        source: Option<DataSourceError>,
    },

    /// Inability to acquire a connection from the data source.
    #[error("could not get connection: {0}")]
    ConnectionFailure(String),

    /// IO error (parameter file loading).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SchemaError {
    /// Create a MetaDataAccess error with no underlying cause.
    pub fn metadata(context: impl Into<String>) -> Self {
        SchemaError::MetaDataAccess {
            context: context.into(),
            source: None,
        }
    }

    /// Create a MetaDataAccess error wrapping a data-source failure.
    pub fn metadata_with(context: impl Into<String>, source: DataSourceError) -> Self {
        SchemaError::MetaDataAccess {
            context: context.into(),
            source: Some(source),
        }
    }

    /// Create a ViolatedCapability error.
    pub fn unsupported(dialect: &'static str, operation: &'static str) -> Self {
        SchemaError::ViolatedCapability { dialect, operation }
    }

    /// Create an InvalidModel error.
    pub fn invalid_model(message: impl Into<String>) -> Self {
        SchemaError::InvalidModel(message.into())
    }

    /// Wrap an error with the table and column being decoded.
    pub fn column_decode(table: impl Into<String>, column: impl Into<String>, source: SchemaError) -> Self {
        SchemaError::ColumnDecode {
            table: table.into(),
            column: column.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for schema copy operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
