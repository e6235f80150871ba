//! Drives a dialect to populate a [`Schema`] from a live data source.
//!
//! The read is synchronous and all-or-nothing: any metadata failure aborts
//! it, and no partially populated schema is returned. The single deliberate
//! exception is foreign keys that point outside the schema being read; they
//! are dropped.

use tracing::{debug, info, warn};

use crate::config::{AcceptAllTables, Configuration, TableFilter};
use crate::core::metadata::DataSource;
use crate::core::schema::{Reference, Schema};
use crate::core::traits::TableSpec;
use crate::error::{Result, SchemaError};

/// Reads schemas through a dialect and a data source.
pub struct SchemaReader<'a> {
    config: &'a Configuration,
    data_source: &'a dyn DataSource,
}

impl<'a> SchemaReader<'a> {
    pub fn new(config: &'a Configuration, data_source: &'a dyn DataSource) -> Self {
        Self {
            config,
            data_source,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        self.config
    }

    /// Read every table of the named schema.
    pub fn read(&self, schema_name: &str) -> Result<Schema> {
        self.read_filtered(schema_name, &AcceptAllTables)
    }

    /// Read the named schema, keeping only the tables the filter accepts.
    ///
    /// Construction order is fixed: tables, columns, primary keys, foreign
    /// keys, unique keys/indices, then sequences. Tables keep catalog
    /// order; columns keep discovery order.
    pub fn read_filtered(&self, schema_name: &str, filter: &dyn TableFilter) -> Result<Schema> {
        let dialect = self.config.dialect();
        let mut schema = Schema::new(schema_name);

        info!("reading tables ...");
        let tables = dialect.get_tables(self.data_source, schema_name)?;
        for spec in &tables {
            let table = spec.to_table();
            if filter.accept(&table) {
                debug!("accepted table {}", spec.name);
                schema.add_table(table);
            } else {
                debug!("skipped table {}", spec.name);
            }
        }

        info!("reading columns ...");
        let columns = dialect.get_columns(self.data_source, schema_name, &tables)?;
        for spec in columns {
            // Columns of filtered-out tables simply find no home.
            if let Some(table) = schema.find_table_mut(&spec.table) {
                table.add_column(spec.column);
            }
        }

        if self.config.supports_primary_keys() {
            self.read_primary_keys(&mut schema, schema_name, &tables)?;
        }
        if self.config.supports_foreign_keys() {
            self.read_foreign_keys(&mut schema)?;
        }
        if self.config.supports_unique_keys() {
            self.read_unique_keys(&mut schema, schema_name, &tables)?;
        }

        info!("supports sequences? {}", self.config.supports_sequences());
        if self.config.supports_sequences() {
            self.read_sequences(&mut schema, schema_name)?;
        }

        info!("schema read");
        Ok(schema)
    }

    fn read_primary_keys(&self, schema: &mut Schema, schema_name: &str, tables: &[TableSpec]) -> Result<()> {
        info!("reading primary keys...");
        let keys = self
            .config
            .dialect()
            .get_primary_keys(self.data_source, schema_name, tables)?;
        for spec in tables {
            let Some(key) = keys.get(&spec.name) else {
                continue;
            };
            if let Some(table) = schema.find_table_mut(&spec.name) {
                key.apply_to(table)?;
            }
        }
        Ok(())
    }

    fn read_foreign_keys(&self, schema: &mut Schema) -> Result<()> {
        info!("reading foreign keys...");
        let table_names: Vec<String> = schema.tables().iter().map(|t| t.name().to_string()).collect();
        for foreign_table in &table_names {
            let rows = self.data_source.imported_keys(foreign_table).map_err(|e| {
                SchemaError::metadata_with(format!("reading imported keys of {}", foreign_table), e)
            })?;
            for row in rows {
                // A referenced table outside this schema means a
                // cross-schema key; those are dropped.
                let Some(primary_table) = schema.find_table(&row.pk_table) else {
                    debug!(
                        "dropping foreign key {:?} on {}: {} is not in this schema",
                        row.name, foreign_table, row.pk_table
                    );
                    continue;
                };
                if primary_table.find_column(&row.pk_column).is_none() {
                    warn!(
                        "foreign key {:?} on {} references unknown column {}.{}",
                        row.name, foreign_table, row.pk_table, row.pk_column
                    );
                    continue;
                }
                let reference = Reference {
                    name: row.name.clone(),
                    table: row.pk_table.clone(),
                    column: row.pk_column.clone(),
                };
                if let Some(column) = schema
                    .find_table_mut(foreign_table)
                    .and_then(|t| t.find_column_mut(&row.fk_column))
                {
                    column.reference = Some(reference);
                }
            }
        }
        Ok(())
    }

    fn read_unique_keys(&self, schema: &mut Schema, schema_name: &str, tables: &[TableSpec]) -> Result<()> {
        info!("reading unique keys...");
        let specs = self
            .config
            .dialect()
            .get_indices(self.data_source, schema_name, tables)?;
        for spec in specs {
            let Some(table) = schema.find_table_mut(&spec.table) else {
                continue;
            };
            if table.find_column(&spec.column).is_none() {
                continue;
            }
            table.add_index_column(spec.name.as_deref(), spec.unique, &spec.column)?;
        }

        // Drivers surface each primary key as a unique index as well;
        // without this pass the key would be written twice.
        for table in schema.tables_mut() {
            table.prune_redundant_primary_key_indices();
        }
        Ok(())
    }

    fn read_sequences(&self, schema: &mut Schema, schema_name: &str) -> Result<()> {
        info!("reading sequences ...");
        let sequences = self
            .config
            .dialect()
            .get_sequences(self.data_source, schema_name)?;
        for sequence in sequences {
            schema.add_sequence(sequence);
        }
        Ok(())
    }
}
