//! Baseline dialect working entirely through driver metadata surfaces.
//!
//! The free functions here are the shared driver-metadata paths; the Oracle
//! dialect falls back to them when its catalog views are not accessible,
//! and the HSQLDB dialect reads through them with its own default-value
//! parsing.

use std::collections::HashMap;

use tracing::debug;

use crate::core::metadata::DataSource;
use crate::core::schema::Column;
use crate::core::traits::{ColumnSpec, Dialect, IndexSpec, PrimaryKeySpec, TableSpec};
use crate::core::types::SqlType;
use crate::error::{Result, SchemaError};

/// Baseline dialect using only driver-provided metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl GenericDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
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
            _ => Err(SchemaError::UnknownTypeName { name: name.to_string() }),
        }
    }

    fn type_name(&self, code: SqlType) -> Result<&'static str> {
        match code {
            SqlType::Bit
            | SqlType::Integer
            | SqlType::Varchar
            | SqlType::Char
            | SqlType::Date
            | SqlType::Numeric
            | SqlType::Decimal
            | SqlType::Timestamp => Ok(code.canonical_name()),
            other => Err(SchemaError::UnknownTypeCode { code: other }),
        }
    }

    fn get_tables(&self, ds: &dyn DataSource, schema: &str) -> Result<Vec<TableSpec>> {
        driver_tables(ds, schema)
    }

    fn get_columns(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<ColumnSpec>> {
        driver_columns(self, ds, schema, tables)
    }

    fn get_primary_keys(
        &self,
        ds: &dyn DataSource,
        schema: &str,
        tables: &[TableSpec],
    ) -> Result<HashMap<String, PrimaryKeySpec>> {
        driver_primary_keys(ds, schema, tables)
    }

    fn get_unique_keys(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<IndexSpec>> {
        driver_indices(ds, schema, tables, true)
    }

    fn get_indices(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<IndexSpec>> {
        driver_indices(ds, schema, tables, false)
    }
}

/// Table listing through the driver metadata surface.
pub(crate) fn driver_tables(ds: &dyn DataSource, schema: &str) -> Result<Vec<TableSpec>> {
    let rows = ds
        .tables(schema)
        .map_err(|e| SchemaError::metadata_with("reading tables", e))?;
    Ok(rows
        .into_iter()
        .map(|meta| TableSpec::with_kind(meta.name, meta.kind))
        .collect())
}

/// Column listing through the driver metadata surface. Default values are
/// parsed with the calling dialect's policy.
pub(crate) fn driver_columns(
    dialect: &dyn Dialect,
    ds: &dyn DataSource,
    schema: &str,
    tables: &[TableSpec],
) -> Result<Vec<ColumnSpec>> {
    let mut specs = Vec::new();
    for table in tables {
        let rows = ds
            .columns(schema, &table.name)
            .map_err(|e| SchemaError::metadata_with(format!("reading columns of {}", table.name), e))?;
        for meta in rows {
            debug!("reading column {}.{}", meta.table, meta.name);
            let default_value = dialect.parse_default_value(meta.default_value.as_deref(), meta.data_type);
            let column = Column::with_default(
                meta.name,
                meta.data_type,
                meta.size,
                meta.decimal_digits,
                meta.nullable,
                default_value,
            );
            specs.push(ColumnSpec {
                table: meta.table,
                column,
            });
        }
    }
    Ok(specs)
}

/// Primary keys through the driver metadata surface, keyed by table name.
pub(crate) fn driver_primary_keys(
    ds: &dyn DataSource,
    schema: &str,
    tables: &[TableSpec],
) -> Result<HashMap<String, PrimaryKeySpec>> {
    let mut by_table: HashMap<String, PrimaryKeySpec> = HashMap::new();
    for table in tables {
        let rows = ds
            .primary_keys(schema, &table.name)
            .map_err(|e| SchemaError::metadata_with(format!("reading primary key of {}", table.name), e))?;
        for meta in rows {
            by_table
                .entry(meta.table.clone())
                .or_insert_with(|| PrimaryKeySpec::new(meta.table, meta.name))
                .add_column(meta.column);
        }
    }
    Ok(by_table)
}

/// Index rows through the driver metadata surface.
pub(crate) fn driver_indices(
    ds: &dyn DataSource,
    schema: &str,
    tables: &[TableSpec],
    unique_only: bool,
) -> Result<Vec<IndexSpec>> {
    let mut specs = Vec::new();
    for table in tables {
        let rows = ds
            .index_info(schema, &table.name, unique_only)
            .map_err(|e| SchemaError::metadata_with(format!("reading indices of {}", table.name), e))?;
        for meta in rows {
            specs.push(IndexSpec {
                table: meta.table,
                column: meta.column,
                name: meta.name,
                unique: !meta.non_unique,
            });
        }
    }
    Ok(specs)
}
