//! HSQLDB dialect. Target side of the copy; its translation rules are what
//! turn an Oracle model into DDL the embedded engine accepts.

use std::collections::HashMap;

use crate::core::metadata::DataSource;
use crate::core::schema::{Column, DefaultValue, Table};
use crate::core::traits::{ColumnSpec, Dialect, IndexSpec, PrimaryKeySpec, TableSpec};
use crate::core::types::SqlType;
use crate::dialects::generic;
use crate::error::{Result, SchemaError};

const SYSDATE: &str = "SYSDATE";

/// Highest FLOAT precision the ANSI standard allows; HSQLDB enforces it
/// while Oracle reports decimal precision for floats.
const MAX_FLOAT_PRECISION: i32 = 53;

/// HSQLDB dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct HsqldbDialect;

impl HsqldbDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for HsqldbDialect {
    fn name(&self) -> &'static str {
        "hsqldb"
    }

    fn supports_identity_columns(&self) -> bool {
        true
    }

    fn supports_views(&self) -> bool {
        true
    }

    fn supports_sequences(&self) -> bool {
        true
    }

    fn type_code(&self, name: &str) -> Result<SqlType> {
        match name {
            "BIT" => Ok(SqlType::Bit),
            "INTEGER" => Ok(SqlType::Integer),
            "VARCHAR" => Ok(SqlType::Varchar),
            "CHAR" => Ok(SqlType::Char),
            "DATE" => Ok(SqlType::Date),
            "NUMERIC" => Ok(SqlType::Numeric),
            "DECIMAL" => Ok(SqlType::Decimal),
            "TIMESTAMP" => Ok(SqlType::Timestamp),
            "LONGVARCHAR" | "CLOB" => Ok(SqlType::Clob),
            "LONGVARBINARY" => Ok(SqlType::Blob),
            "FLOAT" => Ok(SqlType::Float),
            _ => Err(SchemaError::UnknownTypeName { name: name.to_string() }),
        }
    }

    fn type_name(&self, code: SqlType) -> Result<&'static str> {
        match code {
            SqlType::Bit => Ok("BIT"),
            SqlType::Integer => Ok("INTEGER"),
            SqlType::Varchar => Ok("VARCHAR"),
            SqlType::Char => Ok("CHAR"),
            SqlType::Date => Ok("DATE"),
            SqlType::Numeric => Ok("NUMERIC"),
            SqlType::Decimal => Ok("DECIMAL"),
            SqlType::Timestamp => Ok("TIMESTAMP"),
            SqlType::Clob => Ok("CLOB"),
            SqlType::Blob => Ok("LONGVARBINARY"),
            SqlType::Float => Ok("FLOAT"),
            other => Err(SchemaError::UnknownTypeCode { code: other }),
        }
    }

    fn column_type_name(&self, table: &Table, column: &Column) -> Result<&'static str> {
        if table.is_primary_key(&column.name)
            && matches!(column.data_type, SqlType::Decimal | SqlType::Numeric)
        {
            Ok("INTEGER")
        } else if column.data_type == SqlType::Decimal && column.size == 1 && column.precision == 0 {
            Ok("BIT")
        } else if column.data_type == SqlType::Timestamp {
            Ok("TIMESTAMP")
        } else if column.data_type == SqlType::Clob {
            // HACK: HSQLDB chokes on LONGVARCHAR columns, so CLOBs become
            // plain VARCHAR. VARCHAR is scalable, so a CLOB whose reported
            // size exceeds the target's limits may truncate.
            Ok("VARCHAR")
        } else if column.data_type == SqlType::Blob {
            Ok("LONGVARBINARY")
        } else {
            self.type_name(column.data_type)
                .map_err(|e| SchemaError::column_decode(table.name(), &column.name, e))
        }
    }

    fn column_size(&self, column: &Column) -> i32 {
        if column.data_type == SqlType::Float {
            column.size.min(MAX_FLOAT_PRECISION)
        } else {
            column.size
        }
    }

    fn parse_default_value(&self, literal: Option<&str>, code: SqlType) -> Option<DefaultValue> {
        match literal {
            Some(SYSDATE) => Some(DefaultValue::Now),
            Some(value) => Some(DefaultValue::literal(value, code.is_string())),
            None => None,
        }
    }

    fn format_default_value(&self, column: &Column) -> Option<String> {
        match column.default_value.as_ref()? {
            DefaultValue::Now => Some(SYSDATE.to_string()),
            DefaultValue::Literal { value, .. } => Some(value.clone()),
        }
    }

    fn identity_column_string(&self) -> Result<&'static str> {
        Ok("GENERATED BY DEFAULT AS IDENTITY")
    }

    fn driver_class_name(&self) -> Result<&'static str> {
        Ok("org.hsqldb.jdbcDriver")
    }

    fn shutdown_sql(&self) -> Option<&'static str> {
        Some("SHUTDOWN")
    }

    fn next_sequence_value_sql(&self, sequence: &str) -> Result<String> {
        Ok(format!("NEXT VALUE FOR {}", sequence))
    }

    fn get_tables(&self, ds: &dyn DataSource, schema: &str) -> Result<Vec<TableSpec>> {
        generic::driver_tables(ds, schema)
    }

    fn get_columns(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<ColumnSpec>> {
        generic::driver_columns(self, ds, schema, tables)
    }

    fn get_primary_keys(
        &self,
        ds: &dyn DataSource,
        schema: &str,
        tables: &[TableSpec],
    ) -> Result<HashMap<String, PrimaryKeySpec>> {
        generic::driver_primary_keys(ds, schema, tables)
    }

    fn get_unique_keys(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<IndexSpec>> {
        generic::driver_indices(ds, schema, tables, true)
    }

    fn get_indices(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<IndexSpec>> {
        generic::driver_indices(ds, schema, tables, false)
    }
}
