//! # schemamule
//!
//! Copies the structural definition of relational schemas from a source
//! database (Oracle) to a target (HSQLDB), as live DDL or a script file.
//! The crate is the dialect-parameterized core of that copy:
//!
//! - an in-memory **schema model** (tables, columns, keys, indices,
//!   sequences)
//! - **dialects** that read the model out of live database metadata and
//!   write it back as DDL, translating types, default values and identity
//!   columns along the way
//! - a **reader** and a **writer** driving a dialect under a configuration
//!   of capability gates and table filters
//!
//! Connection acquisition, DDL batching and file output stay with the
//! caller; the core consumes a [`DataSource`] and produces strings.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use schemamule::{Configuration, SchemaReader, SchemaWriter};
//! use schemamule::dialects::{dialect_for_uri, HsqldbDialect};
//!
//! # fn connect(uri: &str) -> Box<dyn schemamule::DataSource> { unimplemented!() }
//! # fn main() -> schemamule::Result<()> {
//! let source = connect("jdbc:oracle:thin:@db:1521:PROD");
//! let reading = Configuration::new(Arc::from(dialect_for_uri("jdbc:oracle:thin:@db:1521:PROD")?))
//!     .with_sequences(true);
//! let schema = SchemaReader::new(&reading, source.as_ref()).read("APP")?;
//!
//! let writing = Configuration::new(Arc::new(HsqldbDialect::new())).with_sequences(true);
//! let ddl = SchemaWriter::new(&writing).write_script(std::slice::from_ref(&schema))?;
//! print!("{}", ddl);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod dialects;
pub mod error;
pub mod library;
pub mod reader;
pub mod writer;

// Re-exports for convenient access
pub use crate::config::{AcceptAllTables, Configuration, IncludeExcludeFilter, SchemaParams, TableFilter};
pub use crate::core::metadata::{
    ColumnMeta, DataSource, ImportedKeyMeta, IndexMeta, PrimaryKeyMeta, Row, SqlValue, TableMeta,
};
pub use crate::core::schema::{
    Column, DefaultValue, Index, PrimaryKey, Reference, Schema, Sequence, Table, TableKind,
};
pub use crate::core::traits::{ColumnSpec, Dialect, IndexSpec, PrimaryKeySpec, TableSpec};
pub use crate::core::types::SqlType;
pub use crate::dialects::{dialect_for_uri, dialect_for_uri_with};
pub use crate::error::{DataSourceError, Result, SchemaError};
pub use crate::reader::SchemaReader;
pub use crate::writer::SchemaWriter;
