//! Canonical SQL type codes shared by every dialect.
//!
//! Each dialect maps its own type-name vocabulary onto this fixed set and
//! back. A name or code outside a dialect's registered vocabulary is an
//! error, not a fallback.

use serde::{Deserialize, Serialize};

/// Canonical SQL type codes.
///
/// The set is closed: it covers exactly the types the Oracle-to-HSQLDB
/// translation needs to describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    Bit,
    Integer,
    Varchar,
    Char,
    Date,
    Numeric,
    Decimal,
    Timestamp,
    LongVarchar,
    Clob,
    Float,
    LongVarbinary,
    Blob,
    BigInt,
}

impl SqlType {
    /// All canonical codes, in declaration order.
    pub const ALL: [SqlType; 14] = [
        SqlType::Bit,
        SqlType::Integer,
        SqlType::Varchar,
        SqlType::Char,
        SqlType::Date,
        SqlType::Numeric,
        SqlType::Decimal,
        SqlType::Timestamp,
        SqlType::LongVarchar,
        SqlType::Clob,
        SqlType::Float,
        SqlType::LongVarbinary,
        SqlType::Blob,
        SqlType::BigInt,
    ];

    /// Canonical (dialect-neutral) name for this code, used in error
    /// messages and by the generic vocabulary.
    pub fn canonical_name(self) -> &'static str {
        match self {
            SqlType::Bit => "BIT",
            SqlType::Integer => "INTEGER",
            SqlType::Varchar => "VARCHAR",
            SqlType::Char => "CHAR",
            SqlType::Date => "DATE",
            SqlType::Numeric => "NUMERIC",
            SqlType::Decimal => "DECIMAL",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::LongVarchar => "LONGVARCHAR",
            SqlType::Clob => "CLOB",
            SqlType::Float => "FLOAT",
            SqlType::LongVarbinary => "LONGVARBINARY",
            SqlType::Blob => "BLOB",
            SqlType::BigInt => "BIGINT",
        }
    }

    /// Whether a default value of this type is a string literal.
    pub fn is_string(self) -> bool {
        matches!(self, SqlType::Varchar | SqlType::LongVarchar)
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_name())
    }
}
