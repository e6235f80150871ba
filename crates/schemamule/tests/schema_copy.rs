//! End-to-end reads over the driver-metadata path, modeled on an HSQLDB
//! source holding a small library database.

mod common;

use std::sync::Arc;

use common::FixtureDataSource;
use schemamule::dialects::HsqldbDialect;
use schemamule::{
    Configuration, IncludeExcludeFilter, SchemaReader, SchemaWriter, SqlType, TableKind,
};

/// A small library database: libraries, books, folks, personnel, plus one
/// view. Drivers report each primary key as a system unique index too,
/// which the reader must prune.
fn library_source() -> FixtureDataSource {
    let mut ds = FixtureDataSource::new();

    ds.add_table("T_BOOKS", TableKind::Table);
    ds.add_table("T_FOLKS", TableKind::Table);
    ds.add_table("T_LIBRARIES", TableKind::Table);
    ds.add_table("T_PERSONNEL", TableKind::Table);
    ds.add_table("V_FOLKS_WITH_S_NAMES", TableKind::View);

    ds.add_column("T_BOOKS", "ID", SqlType::Integer, 32, 0, false, None);
    ds.add_column("T_BOOKS", "TITLE", SqlType::Varchar, 50, 0, true, Some("'unknown'"));
    ds.add_column("T_BOOKS", "LIBRARY_ID", SqlType::Integer, 32, 0, false, None);
    ds.add_column("T_BOOKS", "COST", SqlType::Decimal, 10, 2, true, None);
    ds.add_column("T_FOLKS", "ID", SqlType::Integer, 32, 0, false, None);
    ds.add_column("T_FOLKS", "FIRST_NAME", SqlType::Varchar, 50, 0, true, None);
    ds.add_column("T_FOLKS", "LAST_NAME", SqlType::Varchar, 50, 0, true, None);
    ds.add_column("T_LIBRARIES", "ID", SqlType::Integer, 32, 0, false, None);
    ds.add_column("T_LIBRARIES", "NAME", SqlType::Varchar, 30, 0, true, None);
    ds.add_column("T_PERSONNEL", "ID", SqlType::Integer, 32, 0, false, None);
    ds.add_column("T_PERSONNEL", "USERNAME", SqlType::Varchar, 50, 0, true, None);
    ds.add_column("V_FOLKS_WITH_S_NAMES", "ID", SqlType::Integer, 32, 0, true, None);
    ds.add_column("V_FOLKS_WITH_S_NAMES", "FIRST_NAME", SqlType::Varchar, 50, 0, true, None);
    ds.add_column("V_FOLKS_WITH_S_NAMES", "LAST_NAME", SqlType::Varchar, 50, 0, true, None);

    ds.add_primary_key("T_BOOKS", "ID", "SYS_PK_10096");
    ds.add_primary_key("T_FOLKS", "ID", "SYS_PK_10100");
    ds.add_primary_key("T_LIBRARIES", "ID", "SYS_PK_10092");
    ds.add_primary_key("T_PERSONNEL", "ID", "SYS_PK_10104");

    ds.add_imported_key("T_BOOKS", "T_LIBRARIES", "ID", "LIBRARY_ID", "FK_BOOK_LIBRARY");

    // NON_UNIQUE = false on every row: all of these are unique indices.
    ds.add_index("T_BOOKS", "ID", "SYS_IDX_SYS_PK_10096", false);
    ds.add_index("T_FOLKS", "ID", "SYS_IDX_SYS_PK_10100", false);
    ds.add_index("T_LIBRARIES", "ID", "SYS_IDX_SYS_PK_10092", false);
    ds.add_index("T_PERSONNEL", "ID", "SYS_IDX_SYS_PK_10104", false);
    ds.add_index("T_LIBRARIES", "NAME", "SYS_IDX_UK_LIBRARY_NAME_10112", false);
    ds.add_index("T_FOLKS", "FIRST_NAME", "SYS_IDX_UK_FOLKS_NAMES_10116", false);
    ds.add_index("T_FOLKS", "LAST_NAME", "SYS_IDX_UK_FOLKS_NAMES_10116", false);
    ds.add_index("T_PERSONNEL", "ID", "SYS_IDX_UK_PERSONEL_UN_ID_10120", false);
    ds.add_index("T_PERSONNEL", "USERNAME", "SYS_IDX_UK_PERSONEL_UN_ID_10120", false);

    ds
}

fn read_config() -> Configuration {
    Configuration::new(Arc::new(HsqldbDialect::new())).with_foreign_keys(true)
}

#[test]
fn reads_tables_in_catalog_order() {
    let ds = library_source();
    let config = read_config();
    let schema = SchemaReader::new(&config, &ds).read("PUBLIC").unwrap();

    let names: Vec<&str> = schema.tables().iter().map(|t| t.name()).collect();
    assert_eq!(
        names,
        ["T_BOOKS", "T_FOLKS", "T_LIBRARIES", "T_PERSONNEL", "V_FOLKS_WITH_S_NAMES"]
    );
    assert_eq!(schema.find_table("T_BOOKS").unwrap().kind(), TableKind::Table);
    assert_eq!(
        schema.find_table("V_FOLKS_WITH_S_NAMES").unwrap().kind(),
        TableKind::View
    );
}

#[test]
fn single_column_primary_key_and_unique() {
    let ds = library_source();
    let config = read_config();
    let schema = SchemaReader::new(&config, &ds).read("PUBLIC").unwrap();

    let libraries = schema.find_table("T_LIBRARIES").unwrap();
    let names: Vec<&str> = libraries.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["ID", "NAME"]);

    let id = libraries.find_column("ID").unwrap();
    assert_eq!(id.data_type, SqlType::Integer);
    assert_eq!(id.size, 32);
    assert!(!id.nullable);
    assert!(libraries.is_primary_key("ID"));
    assert_eq!(libraries.primary_key().unwrap().name(), Some("SYS_PK_10092"));

    assert!(libraries.is_unique("NAME"));
    assert!(libraries.is_unique_key_member("NAME"));

    // The PK's synthetic unique index is pruned; only the name key stays.
    assert_eq!(libraries.indices().len(), 1);
}

#[test]
fn foreign_key_resolves_within_schema() {
    let ds = library_source();
    let config = read_config();
    let schema = SchemaReader::new(&config, &ds).read("PUBLIC").unwrap();

    let books = schema.find_table("T_BOOKS").unwrap();
    let library_id = books.find_column("LIBRARY_ID").unwrap();
    let reference = library_id.reference.as_ref().expect("missing reference");
    assert_eq!(reference.name.as_deref(), Some("FK_BOOK_LIBRARY"));
    assert_eq!(reference.table, "T_LIBRARIES");
    assert_eq!(reference.column, "ID");

    let libraries = schema.find_table("T_LIBRARIES").unwrap();
    assert!(libraries.find_column("ID").unwrap().reference.is_none());
}

#[test]
fn foreign_keys_are_skipped_when_gate_is_off() {
    let ds = library_source();
    let config = Configuration::new(Arc::new(HsqldbDialect::new()));
    let schema = SchemaReader::new(&config, &ds).read("PUBLIC").unwrap();

    let books = schema.find_table("T_BOOKS").unwrap();
    assert!(books.find_column("LIBRARY_ID").unwrap().reference.is_none());
}

#[test]
fn multi_column_unique_members_are_not_individually_unique() {
    let ds = library_source();
    let config = read_config();
    let schema = SchemaReader::new(&config, &ds).read("PUBLIC").unwrap();

    let folks = schema.find_table("T_FOLKS").unwrap();
    let key = folks
        .find_index("SYS_IDX_UK_FOLKS_NAMES")
        .expect("missing unique key");
    assert!(key.is_unique());
    assert_eq!(key.columns(), ["FIRST_NAME", "LAST_NAME"]);

    assert!(folks.is_unique_key_member("FIRST_NAME"));
    assert!(folks.is_unique_key_member("LAST_NAME"));
    assert!(!folks.is_unique("FIRST_NAME"));
    assert!(!folks.is_unique("LAST_NAME"));
}

#[test]
fn unique_key_strictly_containing_primary_key_is_retained() {
    let ds = library_source();
    let config = read_config();
    let schema = SchemaReader::new(&config, &ds).read("PUBLIC").unwrap();

    let personnel = schema.find_table("T_PERSONNEL").unwrap();
    assert_eq!(personnel.indices().len(), 1);
    let key = &personnel.indices()[0];
    assert_eq!(key.columns(), ["ID", "USERNAME"]);
    assert!(personnel.is_unique_key_member("ID"));
}

#[test]
fn no_single_column_index_shadows_a_primary_key() {
    let ds = library_source();
    let config = read_config();
    let schema = SchemaReader::new(&config, &ds).read("PUBLIC").unwrap();

    for table in schema.tables() {
        for index in table.indices() {
            assert!(
                !(index.columns().len() == 1 && table.is_primary_key_member(&index.columns()[0])),
                "table {} still has a primary-key index {:?}",
                table.name(),
                index.name()
            );
        }
    }
}

#[test]
fn key_and_index_members_exist_on_their_table() {
    let ds = library_source();
    let config = read_config();
    let schema = SchemaReader::new(&config, &ds).read("PUBLIC").unwrap();

    for table in schema.tables() {
        if let Some(pk) = table.primary_key() {
            for column in pk.columns() {
                assert!(table.find_column(column).is_some());
            }
        }
        for index in table.indices() {
            for column in index.columns() {
                assert!(table.find_column(column).is_some());
            }
        }
    }
}

#[test]
fn include_filter_keeps_exactly_the_accepted_tables() {
    let ds = library_source();
    let config = read_config();
    let mut filter = IncludeExcludeFilter::new();
    filter.include("T_BOOKS");

    let schema = SchemaReader::new(&config, &ds)
        .read_filtered("PUBLIC", &filter)
        .unwrap();
    let names: Vec<&str> = schema.tables().iter().map(|t| t.name()).collect();
    assert_eq!(names, ["T_BOOKS"]);
}

#[test]
fn exclude_filter_drops_only_the_rejected_tables() {
    let ds = library_source();
    let config = read_config();
    let mut filter = IncludeExcludeFilter::new();
    filter.exclude("V_FOLKS_WITH_S_NAMES");
    filter.exclude("T_PERSONNEL");

    let schema = SchemaReader::new(&config, &ds)
        .read_filtered("PUBLIC", &filter)
        .unwrap();
    let names: Vec<&str> = schema.tables().iter().map(|t| t.name()).collect();
    assert_eq!(names, ["T_BOOKS", "T_FOLKS", "T_LIBRARIES"]);
}

#[test]
fn string_defaults_keep_their_quotes() {
    let ds = library_source();
    let config = read_config();
    let schema = SchemaReader::new(&config, &ds).read("PUBLIC").unwrap();

    let title = schema
        .find_table("T_BOOKS")
        .unwrap()
        .find_column("TITLE")
        .unwrap();
    match title.default_value.as_ref().expect("missing default") {
        schemamule::DefaultValue::Literal { value, is_string } => {
            assert_eq!(value, "'unknown'");
            assert!(*is_string);
        }
        other => panic!("unexpected default: {:?}", other),
    }
}

#[test]
fn read_schema_writes_back_as_hsqldb_ddl() {
    let ds = library_source();
    let config = read_config();
    let schema = SchemaReader::new(&config, &ds).read("PUBLIC").unwrap();

    let writer = SchemaWriter::new(&config);
    let libraries = schema.find_table("T_LIBRARIES").unwrap();
    let ddl = writer.write_table(libraries).unwrap();
    assert_eq!(
        ddl,
        "CREATE TABLE T_LIBRARIES (\n    \
         ID INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,\n    \
         NAME VARCHAR(30),\n    \
         CONSTRAINT SYS_IDX_UK_LIBRARY_NAME_10112 UNIQUE (NAME)\n)"
    );
}
