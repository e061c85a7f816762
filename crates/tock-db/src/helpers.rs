//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. Timestamps are written in one fixed-width RFC 3339 form so that
//! string comparison in SQL matches chronological order; parsing also accepts
//! plain RFC 3339 and `SQLite`'s `datetime('now')` format.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use tock_core::entities::{Task, Timesheet};

use crate::error::DatabaseError;

/// Drop precision the store cannot keep (below a microsecond).
#[must_use]
pub fn to_store_precision(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.trunc_subsecs(6)
}

/// The current time at store precision, so a returned entity equals its
/// reloaded copy.
#[must_use]
pub fn store_now() -> DateTime<Utc> {
    to_store_precision(Utc::now())
}

/// Format a timestamp for storage, e.g. `"2026-02-09T14:30:00.000000Z"`.
#[must_use]
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Format an optional timestamp; `None` becomes SQL NULL.
#[must_use]
pub fn format_optional_datetime(dt: Option<DateTime<Utc>>) -> libsql::Value {
    dt.map_or(libsql::Value::Null, |dt| format_datetime(dt).into())
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Build a `LIKE` pattern matching `needle` anywhere, with `%`, `_` and `\`
/// taken literally. Use with `ESCAPE '\'`.
#[must_use]
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Task columns in the order [`row_to_task`] expects.
pub const TASK_COLS: &str = "id, synopsis, description, created_at, updated_at, deleted_at";

/// Task columns qualified with the `t` alias.
pub const TASK_COLS_T: &str =
    "t.id, t.synopsis, t.description, t.created_at, t.updated_at, t.deleted_at";

/// Timesheet columns in the order [`row_to_timesheet`] expects.
pub const TIMESHEET_COLS: &str = "id, task_id, start_time, stop_time";

/// Timesheet columns qualified with the `ts` alias.
pub const TIMESHEET_COLS_TS: &str = "ts.id, ts.task_id, ts.start_time, ts.stop_time";

/// Read a task starting at column `offset`.
///
/// # Errors
///
/// Returns `DatabaseError` if a column is missing or malformed.
pub fn row_to_task_at(row: &libsql::Row, offset: i32) -> Result<Task, DatabaseError> {
    Ok(Task {
        id: row.get(offset)?,
        synopsis: row.get(offset + 1)?,
        description: row.get(offset + 2)?,
        created_at: parse_datetime(&row.get::<String>(offset + 3)?)?,
        updated_at: parse_datetime(&row.get::<String>(offset + 4)?)?,
        deleted_at: parse_optional_datetime(row.get::<Option<String>>(offset + 5)?.as_deref())?,
    })
}

/// Read a task from a row selected with [`TASK_COLS`].
///
/// # Errors
///
/// Returns `DatabaseError` if a column is missing or malformed.
pub fn row_to_task(row: &libsql::Row) -> Result<Task, DatabaseError> {
    row_to_task_at(row, 0)
}

/// Read a timesheet from a row selected with [`TIMESHEET_COLS`].
///
/// # Errors
///
/// Returns `DatabaseError` if a column is missing or malformed.
pub fn row_to_timesheet(row: &libsql::Row) -> Result<Timesheet, DatabaseError> {
    Ok(Timesheet {
        id: row.get(0)?,
        task_id: row.get(1)?,
        start_time: parse_datetime(&row.get::<String>(2)?)?,
        stop_time: parse_optional_datetime(row.get::<Option<String>>(3)?.as_deref())?,
    })
}
