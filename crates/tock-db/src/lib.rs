//! # tock-db
//!
//! libSQL store for tock: tasks, timesheets and the run-state invariant.
//!
//! At most one timesheet may be open at any instant. Every mutation that can
//! open a timesheet runs inside a `BEGIN IMMEDIATE` transaction that checks
//! for an existing open row first, and a unique partial index backs the check
//! up for writers in other processes sharing the same database file.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use error::DatabaseError;
use libsql::Builder;

/// Path that opens a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Default wait for a database locked by another connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Central database handle: one libSQL database and one connection.
pub struct TockDb {
    /// Owns the database the connection was opened from; never read.
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl TockDb {
    /// Open a local database file at the given path (or [`MEMORY_PATH`]).
    ///
    /// Enables foreign keys, sets the busy timeout, switches file databases
    /// to WAL and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str, busy_timeout: Duration) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        // These PRAGMAs answer with a row, so they go through `query`.
        conn.query(
            &format!("PRAGMA busy_timeout = {}", busy_timeout.as_millis()),
            (),
        )
        .await
        .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;

        if path != MEMORY_PATH {
            conn.query("PRAGMA journal_mode = WAL", ())
                .await
                .map_err(|e| DatabaseError::Migration(format!("PRAGMA journal_mode: {e}")))?;
        }

        let tock_db = Self { db, conn };
        tock_db.run_migrations().await?;
        tracing::debug!(path, "opened tock database");
        Ok(tock_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> TockDb {
        TockDb::open_local(MEMORY_PATH, DEFAULT_BUSY_TIMEOUT)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        for table in ["tasks", "timesheets"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn invariant_indexes_exist() {
        let db = test_db().await;

        for index in ["idx_tasks_synopsis_live", "idx_timesheets_single_open"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='index' AND name=?1",
                    [index],
                )
                .await
                .unwrap();
            assert!(
                rows.next().await.unwrap().is_some(),
                "index '{index}' should exist"
            );
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        // Run migrations again; must be a no-op
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn single_open_index_rejects_second_open_row() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO tasks (synopsis, created_at, updated_at) VALUES ('a', 'x', 'x')",
                (),
            )
            .await
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO timesheets (task_id, start_time) VALUES (1, '2026-01-01T09:00:00.000000Z')",
                (),
            )
            .await
            .unwrap();

        let result = db
            .conn()
            .execute(
                "INSERT INTO timesheets (task_id, start_time) VALUES (1, '2026-01-01T10:00:00.000000Z')",
                (),
            )
            .await;
        let err = result.expect_err("second open timesheet should be rejected");
        assert!(matches!(
            DatabaseError::from_write(err),
            DatabaseError::UniqueViolation(_)
        ));
    }

    #[tokio::test]
    async fn stop_before_start_is_rejected_by_schema() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO tasks (synopsis, created_at, updated_at) VALUES ('a', 'x', 'x')",
                (),
            )
            .await
            .unwrap();

        let result = db
            .conn()
            .execute(
                "INSERT INTO timesheets (task_id, start_time, stop_time) \
                 VALUES (1, '2026-01-01T10:00:00.000000Z', '2026-01-01T09:00:00.000000Z')",
                (),
            )
            .await;
        assert!(result.is_err());
    }
}
