//! Table rows for tock's types.
//!
//! JSON and raw output serialize the types as they are; a table shows one
//! scalar per column with timestamps and durations made readable.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use tock_core::entities::{ReportRow, Task, Timesheet, TimesheetEntry};
use tock_core::enums::RunStatus;
use tock_db::repos::TaskSwitch;
use tock_monitor::{StatusEvent, StatusSnapshot};

use super::Row;

impl Row for Task {
    const HEADERS: &'static [&'static str] = &["id", "synopsis", "description", "state"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.synopsis.clone(),
            or_dash(&self.description),
            if self.is_deleted() { "deleted" } else { "live" }.to_string(),
        ]
    }
}

impl Row for Timesheet {
    const HEADERS: &'static [&'static str] = &["id", "task_id", "start", "stop", "duration"];

    fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.id.to_string(), self.task_id.to_string()];
        cells.extend(interval_cells(self, Utc::now()));
        cells
    }
}

impl Row for TimesheetEntry {
    const HEADERS: &'static [&'static str] = &["id", "task", "start", "stop", "duration"];

    fn cells(&self) -> Vec<String> {
        entry_cells(self, Utc::now())
    }
}

impl Row for TaskSwitch {
    const HEADERS: &'static [&'static str] = &["started", "task_id", "start", "stopped"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.started.id.to_string(),
            self.started.task_id.to_string(),
            timestamp(self.started.start_time),
            self.stopped
                .as_ref()
                .map_or_else(|| "-".to_string(), |stopped| stopped.id.to_string()),
        ]
    }
}

impl Row for ReportRow {
    const HEADERS: &'static [&'static str] =
        &["day", "task_id", "synopsis", "timesheets", "duration"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.day.to_string(),
            self.task_id.to_string(),
            self.synopsis.clone(),
            self.timesheets.to_string(),
            format_duration(self.duration_secs),
        ]
    }
}

impl Row for StatusSnapshot {
    const HEADERS: &'static [&'static str] = &["status", "task", "since", "elapsed", "error"];

    fn cells(&self) -> Vec<String> {
        StatusLine::from_snapshot(self, Utc::now()).into_cells()
    }
}

impl Row for StatusEvent {
    const HEADERS: &'static [&'static str] = StatusSnapshot::HEADERS;

    fn cells(&self) -> Vec<String> {
        StatusLine::from_event(self, Utc::now()).into_cells()
    }
}

fn entry_cells(entry: &TimesheetEntry, now: DateTime<Utc>) -> Vec<String> {
    let mut cells = vec![entry.timesheet.id.to_string(), entry.task.synopsis.clone()];
    cells.extend(interval_cells(&entry.timesheet, now));
    cells
}

/// Start, stop (or `open`) and the time spent so far.
fn interval_cells(timesheet: &Timesheet, now: DateTime<Utc>) -> [String; 3] {
    [
        timestamp(timesheet.start_time),
        timesheet
            .stop_time
            .map_or_else(|| "open".to_string(), timestamp),
        format_duration(timesheet.duration_at(now).num_seconds()),
    ]
}

/// The run state as one human-readable line.
#[derive(Debug)]
pub struct StatusLine {
    status: RunStatus,
    task: Option<String>,
    since: Option<DateTime<Utc>>,
    elapsed_secs: i64,
    error: Option<String>,
}

impl StatusLine {
    fn new(
        status: RunStatus,
        running: Option<&TimesheetEntry>,
        error: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            status,
            task: running.map(|e| e.task.synopsis.clone()),
            since: running.map(|e| e.timesheet.start_time),
            elapsed_secs: running.map_or(0, |e| e.timesheet.duration_at(now).num_seconds()),
            error: error.map(str::to_string),
        }
    }

    #[must_use]
    pub fn from_snapshot(snapshot: &StatusSnapshot, now: DateTime<Utc>) -> Self {
        Self::new(
            snapshot.status,
            snapshot.running_timesheet.as_ref(),
            snapshot.last_error.as_deref(),
            now,
        )
    }

    #[must_use]
    pub fn from_event(event: &StatusEvent, now: DateTime<Utc>) -> Self {
        Self::new(event.status, event.running_timesheet.as_ref(), None, now)
    }

    fn into_cells(self) -> Vec<String> {
        let running = self.since.is_some();
        vec![
            self.status.to_string(),
            self.task.unwrap_or_else(|| "-".to_string()),
            self.since.map_or_else(|| "-".to_string(), timestamp),
            if running {
                format_duration(self.elapsed_secs)
            } else {
                "-".to_string()
            },
            self.error.unwrap_or_else(|| "-".to_string()),
        ]
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.task, self.since) {
            (Some(error), _, _) => write!(f, "{}: {error}", self.status),
            (None, Some(task), Some(since)) => write!(
                f,
                "{}: {task} since {} ({})",
                self.status,
                timestamp(since),
                format_duration(self.elapsed_secs)
            ),
            _ => write!(f, "{}", self.status),
        }
    }
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `90` -> `"1m 30s"`, `3900` -> `"1h 05m"`.
#[must_use]
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}
