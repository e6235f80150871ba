//! In-memory data source for exercising the reader end to end.
#![allow(dead_code)]

use std::collections::HashMap;

use schemamule::core::metadata::DataSourceResult;
use schemamule::{
    ColumnMeta, DataSource, ImportedKeyMeta, IndexMeta, PrimaryKeyMeta, Row, SqlType, SqlValue,
    TableKind, TableMeta,
};

/// Canned metadata plus canned catalog query results.
///
/// Driver surfaces are looked up per table; catalog queries are answered by
/// substring match against the registered needle (so the fixture does not
/// have to repeat whole SQL statements). An unregistered query errors,
/// which doubles as proof a code path was not taken.
#[derive(Default)]
pub struct FixtureDataSource {
    tables: Vec<TableMeta>,
    columns: HashMap<String, Vec<ColumnMeta>>,
    primary_keys: HashMap<String, Vec<PrimaryKeyMeta>>,
    imported_keys: HashMap<String, Vec<ImportedKeyMeta>>,
    indices: HashMap<String, Vec<IndexMeta>>,
    queries: Vec<(String, Vec<Row>)>,
}

impl FixtureDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, name: &str, kind: TableKind) {
        self.tables.push(TableMeta {
            name: name.to_string(),
            kind,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_column(
        &mut self,
        table: &str,
        name: &str,
        data_type: SqlType,
        size: i32,
        decimal_digits: i32,
        nullable: bool,
        default_value: Option<&str>,
    ) {
        self.columns.entry(table.to_string()).or_default().push(ColumnMeta {
            table: table.to_string(),
            name: name.to_string(),
            data_type,
            size,
            decimal_digits,
            nullable,
            default_value: default_value.map(str::to_string),
        });
    }

    pub fn add_primary_key(&mut self, table: &str, column: &str, name: &str) {
        self.primary_keys
            .entry(table.to_string())
            .or_default()
            .push(PrimaryKeyMeta {
                table: table.to_string(),
                column: column.to_string(),
                name: Some(name.to_string()),
            });
    }

    pub fn add_imported_key(
        &mut self,
        fk_table: &str,
        pk_table: &str,
        pk_column: &str,
        fk_column: &str,
        name: &str,
    ) {
        self.imported_keys
            .entry(fk_table.to_string())
            .or_default()
            .push(ImportedKeyMeta {
                pk_table: pk_table.to_string(),
                pk_column: pk_column.to_string(),
                fk_column: fk_column.to_string(),
                name: Some(name.to_string()),
            });
    }

    pub fn add_index(&mut self, table: &str, column: &str, name: &str, non_unique: bool) {
        self.indices.entry(table.to_string()).or_default().push(IndexMeta {
            table: table.to_string(),
            column: column.to_string(),
            name: Some(name.to_string()),
            non_unique,
        });
    }

    /// Register rows for any catalog query containing `needle`.
    pub fn add_query(&mut self, needle: &str, rows: Vec<Row>) {
        self.queries.push((needle.to_string(), rows));
    }
}

/// Build a row from `(column, value)` pairs.
pub fn row(values: &[(&str, SqlValue)]) -> Row {
    Row::new(
        values.iter().map(|(c, _)| c.to_string()).collect(),
        values.iter().map(|(_, v)| v.clone()).collect(),
    )
}

pub fn text(value: &str) -> SqlValue {
    SqlValue::Text(value.to_string())
}

impl DataSource for FixtureDataSource {
    fn tables(&self, _schema: &str) -> DataSourceResult<Vec<TableMeta>> {
        Ok(self.tables.clone())
    }

    fn columns(&self, _schema: &str, table: &str) -> DataSourceResult<Vec<ColumnMeta>> {
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    fn primary_keys(&self, _schema: &str, table: &str) -> DataSourceResult<Vec<PrimaryKeyMeta>> {
        Ok(self.primary_keys.get(table).cloned().unwrap_or_default())
    }

    fn imported_keys(&self, table: &str) -> DataSourceResult<Vec<ImportedKeyMeta>> {
        Ok(self.imported_keys.get(table).cloned().unwrap_or_default())
    }

    fn index_info(&self, _schema: &str, table: &str, unique_only: bool) -> DataSourceResult<Vec<IndexMeta>> {
        let mut rows = self.indices.get(table).cloned().unwrap_or_default();
        if unique_only {
            rows.retain(|r| !r.non_unique);
        }
        Ok(rows)
    }

    fn query(&self, sql: &str) -> DataSourceResult<Vec<Row>> {
        for (needle, rows) in &self.queries {
            if sql.contains(needle.as_str()) {
                return Ok(rows.clone());
            }
        }
        Err(format!("unexpected query: {}", sql).into())
    }
}
