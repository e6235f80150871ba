//! Emits DDL for a schema model under a target dialect.
//!
//! The writer never mutates the model and never relies on dialect errors
//! for control flow: capability flags are consulted before emitting DDL
//! that depends on them.

use crate::config::Configuration;
use crate::core::schema::{Column, Index, Schema, Sequence, Table, TableKind};
use crate::error::{Result, SchemaError};

/// Types whose DDL never takes a `(size)` suffix.
const UNSCALABLE_TYPE_NAMES: [&str; 5] = ["INTEGER", "BIT", "TIMESTAMP", "DATE", "LONGVARBINARY"];

/// Renders tables, views, indices and sequences as DDL strings.
pub struct SchemaWriter<'a> {
    config: &'a Configuration,
}

impl<'a> SchemaWriter<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// DDL creating the schema itself.
    pub fn write_schema(&self, schema: &Schema) -> String {
        format!("CREATE SCHEMA {} AUTHORIZATION DBA\n", schema.name())
    }

    /// Statement switching the session to the schema.
    pub fn switch_to_schema(&self, schema: &Schema) -> String {
        format!("SET SCHEMA {}\n", schema.name())
    }

    /// DDL for a table. Views become `CREATE VIEW` when the target supports
    /// views and views-as-tables is off; otherwise they are materialized as
    /// tables like everything else.
    pub fn write_table(&self, table: &Table) -> Result<String> {
        if table.kind() == TableKind::View
            && !self.config.views_as_tables()
            && self.config.dialect().supports_views()
        {
            if let Some(text) = table.view_text() {
                return Ok(format!("CREATE VIEW {} AS {}", table.name(), text));
            }
        }
        self.create_table(table)
    }

    fn create_table(&self, table: &Table) -> Result<String> {
        let mut lines = Vec::new();
        for column in table.columns() {
            lines.push(self.write_column(table, column)?);
        }
        for index in table.indices().iter().filter(|i| i.is_unique()) {
            let mut line = String::new();
            if let Some(name) = index.name() {
                line.push_str("CONSTRAINT ");
                line.push_str(name);
                line.push(' ');
            }
            line.push_str("UNIQUE (");
            line.push_str(&index.columns().join(", "));
            line.push(')');
            lines.push(line);
        }
        Ok(format!(
            "CREATE TABLE {} (\n    {}\n)",
            table.name(),
            lines.join(",\n    ")
        ))
    }

    /// DDL fragment declaring one column.
    pub fn write_column(&self, table: &Table, column: &Column) -> Result<String> {
        let dialect = self.config.dialect();
        let type_name = dialect.column_type_name(table, column)?;
        let mut result = format!("{} {}", column.name, type_name);

        let size = dialect.column_size(column);
        if size > 0 && type_is_scalable(type_name) {
            result.push('(');
            result.push_str(&size.to_string());
            result.push(')');
        }

        if column.default_value.is_some() {
            if let Some(formatted) = dialect.format_default_value(column) {
                result.push_str(" DEFAULT ");
                result.push_str(&formatted);
            }
        }

        let mut already_not_null = false;
        if self.config.supports_primary_keys() && table.is_primary_key(&column.name) {
            already_not_null = true;
            if dialect.supports_identity_columns() && type_name == "INTEGER" {
                result.push(' ');
                result.push_str(dialect.identity_column_string()?);
            }
            result.push_str(" PRIMARY KEY");
        }
        if !already_not_null && !column.nullable {
            result.push_str(" NOT NULL");
        }
        Ok(result)
    }

    /// DDL for a standalone index. Unique indices are inlined into the
    /// table body instead, so they render as the empty string here.
    pub fn write_index(&self, table: &Table, index: &Index) -> Result<String> {
        if index.is_unique() {
            return Ok(String::new());
        }
        let name = index.name().ok_or_else(|| {
            SchemaError::invalid_model(format!(
                "cannot write an unnamed index on table {}",
                table.name()
            ))
        })?;
        Ok(format!(
            "CREATE INDEX {} ON {}({})",
            name,
            table.name(),
            index.columns().join(", ")
        ))
    }

    /// DDL for a sequence. The target dialect must support sequences.
    pub fn write_sequence(&self, sequence: &Sequence) -> Result<String> {
        if !self.config.dialect().supports_sequences() {
            return Err(SchemaError::unsupported(
                self.config.dialect().name(),
                "sequences",
            ));
        }
        // This syntax is valid for both Oracle and HSQLDB.
        let mut result = format!("CREATE SEQUENCE {}", sequence.name);
        if let Some(value) = sequence.value {
            result.push_str(" START WITH ");
            result.push_str(&value.to_string());
        }
        Ok(result)
    }

    /// Assemble a full DDL script: per schema, each table followed by its
    /// non-unique indices, then (when the gate is on) the sequences. Every
    /// statement is terminated with `;\n`.
    pub fn write_script(&self, schemas: &[Schema]) -> Result<String> {
        let mut script = String::new();
        for schema in schemas {
            for table in schema.tables() {
                script.push_str(&self.write_table(table)?);
                script.push_str(";\n");
                for index in table.indices().iter().filter(|i| !i.is_unique()) {
                    script.push_str(&self.write_index(table, index)?);
                    script.push_str(";\n");
                }
            }
            if self.config.copy_sequences() {
                for sequence in schema.sequences() {
                    script.push_str(&self.write_sequence(sequence)?);
                    script.push_str(";\n");
                }
            }
        }
        Ok(script)
    }
}

fn type_is_scalable(type_name: &str) -> bool {
    !UNSCALABLE_TYPE_NAMES.contains(&type_name)
}
