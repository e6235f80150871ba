//! Dialect implementations and the URI-prefix registry.
//!
//! The registry maps a JDBC-style URI to the dialect that speaks to that
//! database. A fresh dialect instance is constructed per call so per-run
//! toggles (the Oracle `schema_info_accessible` flag) never leak between
//! copies.

pub mod generic;
pub mod hsqldb;
pub mod oracle;

pub use generic::GenericDialect;
pub use hsqldb::HsqldbDialect;
pub use oracle::OracleDialect;

use crate::core::metadata::{DataSource, Row, SqlValue};
use crate::core::traits::Dialect;
use crate::error::{Result, SchemaError};

/// Resolve the dialect for a JDBC-style URI, with catalog access enabled.
pub fn dialect_for_uri(uri: &str) -> Result<Box<dyn Dialect>> {
    dialect_for_uri_with(uri, true)
}

/// Resolve the dialect for a JDBC-style URI.
///
/// `schema_info_accessible` controls whether the Oracle dialect may query
/// the `user_*` dictionary views directly; when false it reads through the
/// driver metadata surfaces like the generic dialect.
pub fn dialect_for_uri_with(uri: &str, schema_info_accessible: bool) -> Result<Box<dyn Dialect>> {
    let prefix = jdbc_prefix(uri);
    match prefix.as_str() {
        "jdbc:oracle" => Ok(Box::new(
            OracleDialect::new().with_schema_info_accessible(schema_info_accessible),
        )),
        "jdbc:hsqldb" => Ok(Box::new(HsqldbDialect::new())),
        _ => Err(SchemaError::UnsupportedDialect { prefix }),
    }
}

/// First two colon-separated segments of the URI, e.g.
/// `jdbc:oracle:thin:@host:1521:SID` -> `jdbc:oracle`.
fn jdbc_prefix(uri: &str) -> String {
    uri.splitn(3, ':')
        .take(2)
        .collect::<Vec<_>>()
        .join(":")
}

// ===== Shared row-extraction helpers for catalog queries =====

pub(crate) fn run_query(ds: &dyn DataSource, sql: &str) -> Result<Vec<Row>> {
    ds.query(sql)
        .map_err(|e| SchemaError::metadata_with(format!("executing catalog query: {}", sql), e))
}

pub(crate) fn required_text(row: &Row, column: &str) -> Result<String> {
    match row.get(column) {
        Some(SqlValue::Text(value)) => Ok(value.clone()),
        Some(SqlValue::Null) => Err(SchemaError::metadata(format!(
            "unexpected NULL in column {}",
            column
        ))),
        Some(other) => Err(SchemaError::metadata(format!(
            "column {} is not textual: {:?}",
            column, other
        ))),
        None => Err(SchemaError::metadata(format!("missing column {}", column))),
    }
}

pub(crate) fn optional_text(row: &Row, column: &str) -> Result<Option<String>> {
    match row.get(column) {
        Some(SqlValue::Text(value)) => Ok(Some(value.clone())),
        Some(SqlValue::Null) => Ok(None),
        Some(other) => Err(SchemaError::metadata(format!(
            "column {} is not textual: {:?}",
            column, other
        ))),
        None => Err(SchemaError::metadata(format!("missing column {}", column))),
    }
}

pub(crate) fn optional_long(row: &Row, column: &str) -> Result<Option<i64>> {
    match row.get(column) {
        Some(SqlValue::Long(value)) => Ok(Some(*value)),
        Some(SqlValue::Null) => Ok(None),
        Some(other) => Err(SchemaError::metadata(format!(
            "column {} is not numeric: {:?}",
            column, other
        ))),
        None => Err(SchemaError::metadata(format!("missing column {}", column))),
    }
}

pub(crate) fn required_long(row: &Row, column: &str) -> Result<i64> {
    optional_long(row, column)?.ok_or_else(|| {
        SchemaError::metadata(format!("unexpected NULL in column {}", column))
    })
}

pub(crate) fn required_bool(row: &Row, column: &str) -> Result<bool> {
    match row.get(column) {
        Some(SqlValue::Bool(value)) => Ok(*value),
        Some(SqlValue::Long(value)) => Ok(*value != 0),
        Some(other) => Err(SchemaError::metadata(format!(
            "column {} is not boolean: {:?}",
            column, other
        ))),
        None => Err(SchemaError::metadata(format!("missing column {}", column))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_uri_resolves_oracle_dialect() {
        let dialect = dialect_for_uri("jdbc:oracle:thin:@localhost:1521:XE").unwrap();
        assert_eq!(dialect.name(), "oracle");
    }

    #[test]
    fn test_hsqldb_uri_resolves_hsqldb_dialect() {
        let dialect = dialect_for_uri("jdbc:hsqldb:file:target/db").unwrap();
        assert_eq!(dialect.name(), "hsqldb");
    }

    #[test]
    fn test_unknown_uri_is_rejected() {
        let err = dialect_for_uri("jdbc:mysql://localhost/db").unwrap_err();
        match err {
            SchemaError::UnsupportedDialect { prefix } => assert_eq!(prefix, "jdbc:mysql"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_prefix_extraction() {
        assert_eq!(jdbc_prefix("jdbc:oracle:thin:@h:1521:XE"), "jdbc:oracle");
        assert_eq!(jdbc_prefix("jdbc:hsqldb:."), "jdbc:hsqldb");
        assert_eq!(jdbc_prefix("bogus"), "bogus");
    }

    #[test]
    fn test_schema_info_toggle_reaches_oracle_dialect() {
        let dialect = dialect_for_uri_with("jdbc:oracle:thin:@h:1521:XE", false).unwrap();
        assert_eq!(dialect.name(), "oracle");
    }
}
