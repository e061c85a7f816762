//! Timesheet repository: CRUD, open-timesheet queries and the atomic
//! stop/start transitions.
//!
//! Every write that can leave a timesheet open checks for an existing open
//! row inside the same `BEGIN IMMEDIATE` transaction as the write.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tock_core::entities::{Task, Timesheet, TimesheetEntry};
use tock_core::errors::CoreError;

use crate::error::DatabaseError;
use crate::helpers::{
    TASK_COLS_T, TIMESHEET_COLS, TIMESHEET_COLS_TS, format_datetime, format_optional_datetime,
    row_to_task_at, row_to_timesheet, store_now, to_store_precision,
};
use crate::repos::task::find_task;
use crate::service::TockService;

/// Outcome of [`TockService::switch_task`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSwitch {
    /// The timesheet that was closed, if one was running.
    pub stopped: Option<Timesheet>,
    /// The timesheet now running.
    pub started: Timesheet,
}

fn row_to_entry(row: &libsql::Row) -> Result<TimesheetEntry, DatabaseError> {
    Ok(TimesheetEntry {
        timesheet: row_to_timesheet(row)?,
        task: row_to_task_at(row, 4)?,
    })
}

async fn collect_entries(mut rows: libsql::Rows) -> Result<Vec<TimesheetEntry>, DatabaseError> {
    let mut entries = Vec::new();
    while let Some(row) = rows.next().await? {
        entries.push(row_to_entry(&row)?);
    }
    Ok(entries)
}

/// All open timesheets on `conn`, oldest first.
async fn open_timesheets(conn: &libsql::Connection) -> Result<Vec<Timesheet>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {TIMESHEET_COLS} FROM timesheets WHERE stop_time IS NULL ORDER BY start_time, id"
            ),
            (),
        )
        .await?;
    let mut open = Vec::new();
    while let Some(row) = rows.next().await? {
        open.push(row_to_timesheet(&row)?);
    }
    Ok(open)
}

async fn find_timesheet(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Option<Timesheet>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {TIMESHEET_COLS} FROM timesheets WHERE id = ?1"),
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_timesheet(&row)?)),
        None => Ok(None),
    }
}

/// The task a timesheet may be attached to: it must exist and be live.
async fn require_live_task(conn: &libsql::Connection, task_id: i64) -> Result<Task, DatabaseError> {
    let task = find_task(conn, task_id).await?.ok_or_else(|| {
        DatabaseError::InvalidTimesheetState(format!("task {task_id} does not exist"))
    })?;
    if task.is_deleted() {
        return Err(DatabaseError::InvalidTimesheetState(format!(
            "task {task_id} is deleted"
        )));
    }
    Ok(task)
}

/// Close the single open timesheet, if any.
///
/// Fails with `Inconsistent` rather than picking one when several are open.
async fn close_open(
    conn: &libsql::Connection,
    now: DateTime<Utc>,
) -> Result<Option<Timesheet>, DatabaseError> {
    let mut open = open_timesheets(conn).await?;
    if open.len() > 1 {
        let ids: Vec<String> = open.iter().map(|t| t.id.to_string()).collect();
        tracing::error!(ids = %ids.join(","), "multiple open timesheets");
        return Err(DatabaseError::Inconsistent(format!(
            "{} open timesheets found (ids {})",
            open.len(),
            ids.join(", ")
        )));
    }
    let Some(running) = open.pop() else {
        return Ok(None);
    };

    // A timesheet started in the future (clock skew) closes at its start.
    let stop_time = now.max(running.start_time);
    let affected = conn
        .execute(
            "UPDATE timesheets SET stop_time = ?1 WHERE id = ?2 AND stop_time IS NULL",
            libsql::params![format_datetime(stop_time), running.id],
        )
        .await?;
    if affected != 1 {
        return Ok(None);
    }
    Ok(Some(Timesheet {
        stop_time: Some(stop_time),
        ..running
    }))
}

async fn insert_timesheet(
    conn: &libsql::Connection,
    timesheet: &Timesheet,
) -> Result<Timesheet, DatabaseError> {
    conn.execute(
        "INSERT INTO timesheets (task_id, start_time, stop_time) VALUES (?1, ?2, ?3)",
        libsql::params![
            timesheet.task_id,
            format_datetime(timesheet.start_time),
            format_optional_datetime(timesheet.stop_time)
        ],
    )
    .await
    .map_err(DatabaseError::from_write)?;
    Ok(Timesheet {
        id: conn.last_insert_rowid(),
        ..timesheet.clone()
    })
}

/// Check the interval and bring its times to store precision.
fn prepare(timesheet: &Timesheet) -> Result<Timesheet, DatabaseError> {
    timesheet
        .check()
        .map_err(|e| DatabaseError::InvalidTimesheetState(e.to_string()))?;
    Ok(Timesheet {
        start_time: to_store_precision(timesheet.start_time),
        stop_time: timesheet.stop_time.map(to_store_precision),
        ..timesheet.clone()
    })
}

impl TockService {
    /// Persist a new timesheet.
    ///
    /// An open timesheet is only inserted if no other timesheet is open.
    ///
    /// # Errors
    ///
    /// - `InvalidTimesheetState` if it already has an id, has no task, stops
    ///   before it starts, or references a missing or deleted task
    /// - `AlreadyRunning` if it is open and another timesheet is open
    pub async fn create_timesheet(&self, timesheet: &Timesheet) -> Result<Timesheet, DatabaseError> {
        if timesheet.id != 0 {
            return Err(DatabaseError::InvalidTimesheetState(
                "already persisted".into(),
            ));
        }
        let timesheet = &prepare(timesheet)?;

        let tx = self.write_tx().await?;
        let result: Result<Timesheet, DatabaseError> = async {
            require_live_task(&tx, timesheet.task_id).await?;
            if timesheet.is_open()
                && let Some(running) = open_timesheets(&tx).await?.into_iter().next()
            {
                return Err(DatabaseError::AlreadyRunning {
                    timesheet_id: running.id,
                });
            }
            insert_timesheet(&tx, timesheet).await
        }
        .await;
        let created = tx.finish(result).await?;

        tracing::debug!(id = created.id, task_id = created.task_id, open = created.is_open(), "created timesheet");
        Ok(created)
    }

    /// Load a timesheet by id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimesheetState` if the id is `0` or does not exist.
    pub async fn load_timesheet(&self, id: i64) -> Result<Timesheet, DatabaseError> {
        if id == 0 {
            return Err(DatabaseError::InvalidTimesheetState("no identifier".into()));
        }
        let conn = self.read_conn().await;
        find_timesheet(&conn, id)
            .await?
            .ok_or_else(|| DatabaseError::InvalidTimesheetState(format!("timesheet {id} does not exist")))
    }

    /// Correct a timesheet's task, start or stop time.
    ///
    /// Reopening a timesheet (clearing `stop_time`) is refused while a
    /// different timesheet is open.
    ///
    /// # Errors
    ///
    /// - `InvalidTimesheetState` for a missing id or task, an inverted
    ///   interval, an unknown timesheet or a missing task
    /// - `AlreadyRunning` when reopening would leave two open
    pub async fn update_timesheet(&self, timesheet: &Timesheet) -> Result<Timesheet, DatabaseError> {
        if timesheet.id == 0 {
            return Err(DatabaseError::InvalidTimesheetState("not persisted".into()));
        }
        let timesheet = &prepare(timesheet)?;

        let tx = self.write_tx().await?;
        let result: Result<Timesheet, DatabaseError> = async {
            let current = find_timesheet(&tx, timesheet.id).await?.ok_or_else(|| {
                DatabaseError::InvalidTimesheetState(format!(
                    "timesheet {} does not exist",
                    timesheet.id
                ))
            })?;
            if current.task_id != timesheet.task_id {
                require_live_task(&tx, timesheet.task_id).await?;
            }
            if timesheet.is_open()
                && let Some(running) = open_timesheets(&tx)
                    .await?
                    .into_iter()
                    .find(|open| open.id != timesheet.id)
            {
                return Err(DatabaseError::AlreadyRunning {
                    timesheet_id: running.id,
                });
            }

            tx.execute(
                "UPDATE timesheets SET task_id = ?1, start_time = ?2, stop_time = ?3 WHERE id = ?4",
                libsql::params![
                    timesheet.task_id,
                    format_datetime(timesheet.start_time),
                    format_optional_datetime(timesheet.stop_time),
                    timesheet.id
                ],
            )
            .await
            .map_err(DatabaseError::from_write)?;
            Ok(timesheet.clone())
        }
        .await;
        tx.finish(result).await
    }

    /// Remove a timesheet outright.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimesheetState` if the id is `0` or does not exist.
    pub async fn delete_timesheet(&self, id: i64) -> Result<(), DatabaseError> {
        if id == 0 {
            return Err(DatabaseError::InvalidTimesheetState("not persisted".into()));
        }
        let tx = self.write_tx().await?;
        let result: Result<(), DatabaseError> = async {
            let affected = tx
                .execute("DELETE FROM timesheets WHERE id = ?1", [id])
                .await?;
            if affected == 0 {
                return Err(DatabaseError::InvalidTimesheetState(format!(
                    "timesheet {id} does not exist"
                )));
            }
            Ok(())
        }
        .await;
        tx.finish(result).await
    }

    /// Close the running timesheet at the current time.
    ///
    /// Concurrent callers serialize on the write transaction: exactly one
    /// closes the timesheet, the others see `NoRunningTask`.
    ///
    /// # Errors
    ///
    /// - `NoRunningTask` if nothing is open (expected; callers should not log it)
    /// - `Inconsistent` if more than one timesheet is open
    pub async fn stop_running(&self) -> Result<Timesheet, DatabaseError> {
        let tx = self.write_tx().await?;
        let result = close_open(&tx, store_now()).await;
        let stopped = tx
            .finish(result)
            .await?
            .ok_or(DatabaseError::NoRunningTask)?;

        tracing::info!(id = stopped.id, task_id = stopped.task_id, "stopped timesheet");
        Ok(stopped)
    }

    /// Stop whatever is running and start `task_id`, as one transaction.
    ///
    /// Switching to the task that is already running keeps its timesheet.
    ///
    /// # Errors
    ///
    /// - `InvalidTimesheetState` if the task is `0`, missing or deleted
    /// - `Inconsistent` if more than one timesheet is open
    pub async fn switch_task(&self, task_id: i64) -> Result<TaskSwitch, DatabaseError> {
        if task_id == 0 {
            return Err(DatabaseError::InvalidTimesheetState(
                CoreError::NoTaskAssociation.to_string(),
            ));
        }

        let now = store_now();
        let tx = self.write_tx().await?;
        let result: Result<TaskSwitch, DatabaseError> = async {
            require_live_task(&tx, task_id).await?;

            let open = open_timesheets(&tx).await?;
            if let [running] = open.as_slice()
                && running.task_id == task_id
            {
                return Ok(TaskSwitch {
                    stopped: None,
                    started: running.clone(),
                });
            }

            let stopped = close_open(&tx, now).await?;
            let started = insert_timesheet(&tx, &Timesheet::open(task_id, now)).await?;
            Ok(TaskSwitch { stopped, started })
        }
        .await;
        let switch = tx.finish(result).await?;

        tracing::info!(
            task_id,
            started = switch.started.id,
            stopped = ?switch.stopped.as_ref().map(|t| t.id),
            "switched task"
        );
        Ok(switch)
    }

    /// Open timesheets joined with their tasks, oldest first.
    ///
    /// Under the store invariant this holds at most one entry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn search_open(&self) -> Result<Vec<TimesheetEntry>, DatabaseError> {
        let conn = self.read_conn().await;
        let rows = conn
            .query(
                &format!(
                    "SELECT {TIMESHEET_COLS_TS}, {TASK_COLS_T}
                     FROM timesheets ts JOIN tasks t ON t.id = ts.task_id
                     WHERE ts.stop_time IS NULL
                     ORDER BY ts.start_time, ts.id"
                ),
                (),
            )
            .await?;
        collect_entries(rows).await
    }

    /// Every timesheet joined with its task, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn load_all_timesheets(&self) -> Result<Vec<TimesheetEntry>, DatabaseError> {
        let conn = self.read_conn().await;
        let rows = conn
            .query(
                &format!(
                    "SELECT {TIMESHEET_COLS_TS}, {TASK_COLS_T}
                     FROM timesheets ts JOIN tasks t ON t.id = ts.task_id
                     ORDER BY ts.start_time DESC, ts.id DESC"
                ),
                (),
            )
            .await?;
        collect_entries(rows).await
    }

    /// Timesheets recorded against one task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn timesheets_for_task(&self, task_id: i64) -> Result<Vec<Timesheet>, DatabaseError> {
        let conn = self.read_conn().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {TIMESHEET_COLS} FROM timesheets WHERE task_id = ?1 ORDER BY start_time, id"
                ),
                [task_id],
            )
            .await?;
        let mut timesheets = Vec::new();
        while let Some(row) = rows.next().await? {
            timesheets.push(row_to_timesheet(&row)?);
        }
        Ok(timesheets)
    }

    /// The `limit` live tasks started most recently, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn last_started_tasks(&self, limit: u32) -> Result<Vec<Task>, DatabaseError> {
        let conn = self.read_conn().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {TASK_COLS_T}
                     FROM tasks t
                     JOIN (SELECT task_id, MAX(start_time) AS last_start
                           FROM timesheets GROUP BY task_id) ls ON ls.task_id = t.id
                     WHERE t.deleted_at IS NULL
                     ORDER BY ls.last_start DESC, t.id DESC
                     LIMIT ?1"
                ),
                [i64::from(limit)],
            )
            .await?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task_at(&row, 0)?);
        }
        Ok(tasks)
    }
}
