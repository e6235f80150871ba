//! Oracle dialect.
//!
//! Reads the `user_*` dictionary views directly instead of the driver
//! metadata surfaces, both for speed and because the Oracle driver's
//! `getPrimaryKeys`/`getIndexInfo` support is unreliable. When the
//! dictionary views are not accessible to the connecting user
//! (`schema_info_accessible` off), every reader falls back to the generic
//! driver-metadata path.

use std::collections::HashMap;

use tracing::debug;

use crate::core::metadata::DataSource;
use crate::core::schema::{Column, DefaultValue, Sequence};
use crate::core::traits::{ColumnSpec, Dialect, IndexSpec, PrimaryKeySpec, TableSpec};
use crate::core::types::SqlType;
use crate::dialects::{generic, optional_long, optional_text, required_bool, required_long, required_text, run_query};
use crate::error::{Result, SchemaError};

const TABLES_SQL: &str = "SELECT table_name FROM user_tables";

const VIEWS_SQL: &str = "SELECT view_name, text FROM user_views";

const COLUMNS_SQL: &str = "SELECT column_name, table_name, data_type, \
     NVL(data_precision, data_length) AS column_size, \
     data_scale AS decimal_digits, \
     DECODE(nullable, 'Y', 1, 0) AS nullable, \
     data_default AS column_def \
     FROM user_tab_columns";

const PRIMARY_KEYS_SQL: &str = "SELECT ucc.column_name, ucc.constraint_name, ucc.table_name \
     FROM user_constraints uc \
     INNER JOIN user_cons_columns ucc ON ucc.constraint_name = uc.constraint_name \
     WHERE uc.constraint_type = 'P'";

const UNIQUE_KEYS_SQL: &str = "SELECT ucc.column_name, ucc.constraint_name, ucc.table_name \
     FROM user_constraints uc \
     INNER JOIN user_cons_columns ucc ON ucc.constraint_name = uc.constraint_name \
     WHERE uc.constraint_type = 'U'";

const SEQUENCES_SQL: &str = "SELECT sequence_name, last_number FROM user_sequences";

const SYSDATE: &str = "SYSDATE";
const SYSTIMESTAMP: &str = "SYSTIMESTAMP";

/// Oracle dialect. Source side of the copy.
#[derive(Debug, Clone, Copy)]
pub struct OracleDialect {
    schema_info_accessible: bool,
}

impl Default for OracleDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl OracleDialect {
    /// Create a dialect with dictionary-view access enabled.
    pub fn new() -> Self {
        Self {
            schema_info_accessible: true,
        }
    }

    /// Toggle direct dictionary-view access.
    pub fn with_schema_info_accessible(mut self, accessible: bool) -> Self {
        self.schema_info_accessible = accessible;
        self
    }

    pub fn schema_info_accessible(&self) -> bool {
        self.schema_info_accessible
    }
}

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn supports_views(&self) -> bool {
        true
    }

    fn supports_sequences(&self) -> bool {
        true
    }

    fn type_code(&self, name: &str) -> Result<SqlType> {
        match name {
            // An Oracle DATE is really a TIMESTAMP(0) and is used as such
            // in schemas we cannot change, so the name maps asymmetrically.
            "DATE" | "TIMESTAMP" | "TIMESTAMP(3)" | "TIMESTAMP(6)" => Ok(SqlType::Timestamp),
            "NUMBER" => Ok(SqlType::Numeric),
            "INTEGER" => Ok(SqlType::Integer),
            "VARCHAR2" => Ok(SqlType::Varchar),
            "CHAR" => Ok(SqlType::Char),
            "CLOB" => Ok(SqlType::Clob),
            "BLOB" => Ok(SqlType::Blob),
            "FLOAT" => Ok(SqlType::Float),
            "LONG" => Ok(SqlType::BigInt),
            _ => Err(SchemaError::UnknownTypeName { name: name.to_string() }),
        }
    }

    fn type_name(&self, code: SqlType) -> Result<&'static str> {
        match code {
            SqlType::Timestamp => Ok("TIMESTAMP"),
            SqlType::Date => Ok("DATE"),
            SqlType::Numeric => Ok("NUMBER"),
            SqlType::Integer => Ok("INTEGER"),
            SqlType::Varchar => Ok("VARCHAR2"),
            SqlType::Char => Ok("CHAR"),
            SqlType::Clob => Ok("CLOB"),
            SqlType::Blob => Ok("BLOB"),
            SqlType::Float => Ok("FLOAT"),
            SqlType::BigInt => Ok("LONG"),
            other => Err(SchemaError::UnknownTypeCode { code: other }),
        }
    }

    fn parse_default_value(&self, literal: Option<&str>, code: SqlType) -> Option<DefaultValue> {
        match literal {
            Some(value) if matches!(value.trim(), SYSDATE | SYSTIMESTAMP) => Some(DefaultValue::Now),
            Some(value) => Some(DefaultValue::literal(value, code.is_string())),
            None => None,
        }
    }

    fn format_default_value(&self, column: &Column) -> Option<String> {
        match column.default_value.as_ref()? {
            DefaultValue::Now if column.data_type == SqlType::Date => Some(SYSDATE.to_string()),
            DefaultValue::Now => Some(SYSTIMESTAMP.to_string()),
            DefaultValue::Literal { value, .. } => Some(value.clone()),
        }
    }

    fn driver_class_name(&self) -> Result<&'static str> {
        Ok("oracle.jdbc.OracleDriver")
    }

    fn next_sequence_value_sql(&self, sequence: &str) -> Result<String> {
        Ok(format!("{}.NEXTVAL", sequence))
    }

    fn get_tables(&self, ds: &dyn DataSource, schema: &str) -> Result<Vec<TableSpec>> {
        if !self.schema_info_accessible {
            return generic::driver_tables(ds, schema);
        }
        let mut specs = Vec::new();
        for row in run_query(ds, TABLES_SQL)? {
            let name = required_text(&row, "TABLE_NAME")?;
            // Toad's scratch table is never part of the application schema.
            if name == "TOAD_PLAN_TABLE" {
                continue;
            }
            specs.push(TableSpec::table(name));
        }
        for row in run_query(ds, VIEWS_SQL)? {
            let name = required_text(&row, "VIEW_NAME")?;
            let text = required_text(&row, "TEXT")?;
            specs.push(TableSpec::view(name, text));
        }
        Ok(specs)
    }

    fn get_columns(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<ColumnSpec>> {
        if !self.schema_info_accessible {
            return generic::driver_columns(self, ds, schema, tables);
        }
        let mut specs = Vec::new();
        for row in run_query(ds, COLUMNS_SQL)? {
            let column_name = required_text(&row, "COLUMN_NAME")?;
            debug!("reading column {}", column_name);
            let table_name = required_text(&row, "TABLE_NAME")?;
            let data_type = required_text(&row, "DATA_TYPE")
                .and_then(|name| self.type_code(&name))
                .map_err(|e| SchemaError::column_decode(table_name.as_str(), column_name.as_str(), e))?;
            let size = optional_long(&row, "COLUMN_SIZE")?.unwrap_or(0) as i32;
            let decimal_digits = optional_long(&row, "DECIMAL_DIGITS")?.unwrap_or(0) as i32;
            let nullable = required_bool(&row, "NULLABLE")?;
            let default_value = optional_text(&row, "COLUMN_DEF")?;
            let column = Column::with_default(
                column_name,
                data_type,
                size,
                decimal_digits,
                nullable,
                self.parse_default_value(default_value.as_deref(), data_type),
            );
            specs.push(ColumnSpec {
                table: table_name,
                column,
            });
        }
        Ok(specs)
    }

    fn get_primary_keys(
        &self,
        ds: &dyn DataSource,
        schema: &str,
        tables: &[TableSpec],
    ) -> Result<HashMap<String, PrimaryKeySpec>> {
        if !self.schema_info_accessible {
            return generic::driver_primary_keys(ds, schema, tables);
        }
        let mut by_table: HashMap<String, PrimaryKeySpec> = HashMap::new();
        for row in run_query(ds, PRIMARY_KEYS_SQL)? {
            let constraint = required_text(&row, "CONSTRAINT_NAME")?;
            let column = required_text(&row, "COLUMN_NAME")?;
            debug!("reading primary key:column {}:{}", constraint, column);
            let table = required_text(&row, "TABLE_NAME")?;
            by_table
                .entry(table.clone())
                .or_insert_with(|| PrimaryKeySpec::new(table, Some(constraint)))
                .add_column(column);
        }
        Ok(by_table)
    }

    fn get_unique_keys(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<IndexSpec>> {
        if !self.schema_info_accessible {
            return generic::driver_indices(ds, schema, tables, true);
        }
        let mut specs = Vec::new();
        for row in run_query(ds, UNIQUE_KEYS_SQL)? {
            let column = required_text(&row, "COLUMN_NAME")?;
            let constraint = required_text(&row, "CONSTRAINT_NAME")?;
            debug!("reading unique constraint:column {}:{}", constraint, column);
            specs.push(IndexSpec {
                table: required_text(&row, "TABLE_NAME")?,
                column,
                name: Some(constraint),
                unique: true,
            });
        }
        Ok(specs)
    }

    fn get_indices(&self, ds: &dyn DataSource, schema: &str, tables: &[TableSpec]) -> Result<Vec<IndexSpec>> {
        // The dictionary path only surfaces unique constraints; Oracle's
        // driver getIndexInfo is what the fallback covers.
        if self.schema_info_accessible {
            self.get_unique_keys(ds, schema, tables)
        } else {
            generic::driver_indices(ds, schema, tables, false)
        }
    }

    fn get_sequences(&self, ds: &dyn DataSource, schema: &str) -> Result<Vec<Sequence>> {
        if !self.schema_info_accessible {
            return Ok(Vec::new());
        }
        let _ = schema;
        let mut sequences = Vec::new();
        for row in run_query(ds, SEQUENCES_SQL)? {
            let name = required_text(&row, "SEQUENCE_NAME")?;
            let value = required_long(&row, "LAST_NUMBER")?;
            debug!("reading sequence {}; currval={}", name, value);
            sequences.push(Sequence::new(name, Some(value)));
        }
        Ok(sequences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Table;

    #[test]
    fn test_date_name_maps_to_timestamp_code() {
        let dialect = OracleDialect::new();
        assert_eq!(dialect.type_code("DATE").unwrap(), SqlType::Timestamp);
        assert_eq!(dialect.type_name(SqlType::Date).unwrap(), "DATE");
    }

    #[test]
    fn test_precisioned_timestamps_map_to_timestamp() {
        let dialect = OracleDialect::new();
        assert_eq!(dialect.type_code("TIMESTAMP(3)").unwrap(), SqlType::Timestamp);
        assert_eq!(dialect.type_code("TIMESTAMP(6)").unwrap(), SqlType::Timestamp);
        assert_eq!(dialect.type_name(SqlType::Timestamp).unwrap(), "TIMESTAMP");
    }

    #[test]
    fn test_type_names_round_trip_except_date() {
        let dialect = OracleDialect::new();
        for code in SqlType::ALL {
            let Ok(name) = dialect.type_name(code) else {
                continue;
            };
            if code == SqlType::Date {
                // The one documented asymmetry.
                assert_eq!(dialect.type_code(name).unwrap(), SqlType::Timestamp);
            } else {
                assert_eq!(dialect.type_code(name).unwrap(), code);
            }
        }
    }

    #[test]
    fn test_parse_current_time_tokens() {
        let dialect = OracleDialect::new();
        assert_eq!(
            dialect.parse_default_value(Some("SYSDATE"), SqlType::Timestamp),
            Some(DefaultValue::Now)
        );
        assert_eq!(
            dialect.parse_default_value(Some("SYSTIMESTAMP "), SqlType::Timestamp),
            Some(DefaultValue::Now)
        );
        assert_eq!(
            dialect.parse_default_value(Some("'n/a'"), SqlType::Varchar),
            Some(DefaultValue::literal("'n/a'", true))
        );
    }

    #[test]
    fn test_format_now_depends_on_column_type() {
        let dialect = OracleDialect::new();
        let mut date_col = Column::new("CREATED", SqlType::Date, 0, 0, true);
        date_col.default_value = Some(DefaultValue::Now);
        assert_eq!(dialect.format_default_value(&date_col).as_deref(), Some("SYSDATE"));

        let mut ts_col = Column::new("CREATED", SqlType::Timestamp, 0, 0, true);
        ts_col.default_value = Some(DefaultValue::Now);
        assert_eq!(
            dialect.format_default_value(&ts_col).as_deref(),
            Some("SYSTIMESTAMP")
        );
    }

    #[test]
    fn test_default_round_trip_for_literals() {
        let dialect = OracleDialect::new();
        let parsed = dialect.parse_default_value(Some("42"), SqlType::Numeric);
        let mut column = Column::new("N", SqlType::Numeric, 10, 0, true);
        column.default_value = parsed;
        assert_eq!(dialect.format_default_value(&column).as_deref(), Some("42"));
    }

    #[test]
    fn test_sql_fragments() {
        let dialect = OracleDialect::new();
        assert_eq!(dialect.driver_class_name().unwrap(), "oracle.jdbc.OracleDriver");
        assert_eq!(dialect.next_sequence_value_sql("SEQ_X").unwrap(), "SEQ_X.NEXTVAL");
        assert!(dialect.shutdown_sql().is_none());
    }

    #[test]
    fn test_column_type_name_is_context_free() {
        let dialect = OracleDialect::new();
        let table = Table::new("T");
        let column = Column::new("N", SqlType::Numeric, 10, 0, true);
        assert_eq!(dialect.column_type_name(&table, &column).unwrap(), "NUMBER");
    }
}
