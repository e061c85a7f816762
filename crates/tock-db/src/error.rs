//! Database error types for tock-db.

use thiserror::Error;

/// Errors from task and timesheet store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A task operation's precondition was violated.
    #[error("Invalid task state: {0}")]
    InvalidTaskState(String),

    /// A timesheet operation's precondition was violated.
    #[error("Invalid timesheet state: {0}")]
    InvalidTimesheetState(String),

    /// There is no open timesheet to stop. Expected, not a failure.
    #[error("No running task")]
    NoRunningTask,

    /// Starting a timesheet would leave two open at once.
    #[error("Timesheet {timesheet_id} is already running")]
    AlreadyRunning { timesheet_id: i64 },

    /// The store holds data that breaks the single-open-timesheet invariant.
    #[error("Store is inconsistent: {0}")]
    Inconsistent(String),

    /// A uniqueness constraint rejected the write.
    #[error("Uniqueness violation: {0}")]
    UniqueViolation(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether this is the expected "nothing to stop" condition.
    #[must_use]
    pub const fn is_no_running_task(&self) -> bool {
        matches!(self, Self::NoRunningTask)
    }

    /// Map a libSQL write error, surfacing constraint collisions as
    /// [`DatabaseError::UniqueViolation`].
    #[must_use]
    pub fn from_write(err: libsql::Error) -> Self {
        let message = err.to_string();
        if message.contains("UNIQUE constraint failed") {
            Self::UniqueViolation(message)
        } else {
            Self::LibSql(err)
        }
    }
}
