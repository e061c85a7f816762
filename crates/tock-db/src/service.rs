//! Service layer owning the database handle and serializing writes.
//!
//! `TockService` wraps `TockDb`. All repo methods are implemented as
//! `impl TockService` blocks in [`crate::repos`].
//!
//! Every mutation follows this protocol:
//! 1. Take the in-process connection gate (one transaction per connection)
//! 2. `BEGIN IMMEDIATE` (takes the database write lock across processes)
//! 3. Validate against the current rows, then execute SQL
//! 4. Commit, or roll back on any error
//!
//! Reads take the same gate, so they never run inside another caller's
//! uncommitted transaction on the shared connection.

use std::ops::Deref;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};

use crate::TockDb;
use crate::error::DatabaseError;

/// Task and timesheet store backed by one libSQL connection.
pub struct TockService {
    db: TockDb,
    gate: Mutex<()>,
}

impl TockService {
    /// Create a new service over a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, busy_timeout: Duration) -> Result<Self, DatabaseError> {
        let db = TockDb::open_local(db_path, busy_timeout).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `TockDb`.
    #[must_use]
    pub fn from_db(db: TockDb) -> Self {
        Self {
            db,
            gate: Mutex::new(()),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &TockDb {
        &self.db
    }

    /// Borrow the connection for reads once no transaction is open on it.
    ///
    /// Keep the guard alive until the returned rows are consumed.
    pub(crate) async fn read_conn(&self) -> ReadConn<'_> {
        ReadConn {
            _gate: self.gate.lock().await,
            conn: self.db.conn(),
        }
    }

    /// Open an immediate write transaction.
    pub(crate) async fn write_tx(&self) -> Result<WriteTx<'_>, DatabaseError> {
        let gate = self.gate.lock().await;
        let tx = self
            .db
            .conn()
            .transaction_with_behavior(libsql::TransactionBehavior::Immediate)
            .await?;
        Ok(WriteTx { _gate: gate, tx })
    }
}

/// The shared connection, held outside any transaction.
pub(crate) struct ReadConn<'a> {
    _gate: MutexGuard<'a, ()>,
    conn: &'a libsql::Connection,
}

impl Deref for ReadConn<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        self.conn
    }
}

/// An open `BEGIN IMMEDIATE` transaction holding the service's write gate.
pub(crate) struct WriteTx<'a> {
    _gate: MutexGuard<'a, ()>,
    tx: libsql::Transaction,
}

impl WriteTx<'_> {
    /// Commit when `result` is `Ok`, roll back otherwise, and pass `result` on.
    pub(crate) async fn finish<T>(
        self,
        result: Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        match result {
            Ok(value) => {
                self.tx.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) = self.tx.rollback().await {
                    tracing::warn!(%rollback_error, %error, "rollback failed");
                }
                Err(error)
            }
        }
    }
}

impl Deref for WriteTx<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}
