//! Helper functions the copied schema expects on the HSQLDB side.
//!
//! The target schema binds these as SQL aliases (`NVL`, `TRUNC`) so that
//! application SQL written against Oracle keeps working. Creating the
//! aliases and the one-row `DUAL` compatibility table is the caller's job.

use chrono::{NaiveDateTime, NaiveTime};

/// Oracle `NVL`: the value when present, otherwise the fallback.
pub fn nvl<T>(value: Option<T>, default: T) -> T {
    value.unwrap_or(default)
}

/// Oracle `TRUNC` on a timestamp: the same local date with the time of day
/// zeroed out.
pub fn trunc(timestamp: NaiveDateTime) -> NaiveDateTime {
    NaiveDateTime::new(timestamp.date(), NaiveTime::MIN)
}
