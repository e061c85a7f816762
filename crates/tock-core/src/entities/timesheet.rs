use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Task;
use crate::errors::CoreError;

/// One recorded interval against a task. Open while `stop_time` is unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timesheet {
    pub id: i64,
    pub task_id: i64,
    pub start_time: DateTime<Utc>,
    pub stop_time: Option<DateTime<Utc>>,
}

impl Timesheet {
    /// Build an unpersisted, open timesheet for `task_id` starting at `start_time`.
    #[must_use]
    pub const fn open(task_id: i64, start_time: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            task_id,
            start_time,
            stop_time: None,
        }
    }

    /// Build an unpersisted, closed timesheet.
    #[must_use]
    pub const fn closed(task_id: i64, start_time: DateTime<Utc>, stop_time: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            task_id,
            start_time,
            stop_time: Some(stop_time),
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.stop_time.is_none()
    }

    /// Check the task association and interval ordering.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NoTaskAssociation` for task id `0` and
    /// `CoreError::StopBeforeStart` for an inverted interval.
    pub fn check(&self) -> Result<(), CoreError> {
        if self.task_id == 0 {
            return Err(CoreError::NoTaskAssociation);
        }
        if self.stop_time.is_some_and(|stop| stop < self.start_time) {
            return Err(CoreError::StopBeforeStart);
        }
        Ok(())
    }

    /// Elapsed time, measured against `now` while the timesheet is open.
    #[must_use]
    pub fn duration_at(&self, now: DateTime<Utc>) -> Duration {
        self.stop_time.unwrap_or(now) - self.start_time
    }
}

/// A timesheet joined with the task it belongs to.
///
/// The task is loaded regardless of its deletion state so historical
/// timesheets stay displayable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimesheetEntry {
    #[serde(flatten)]
    pub timesheet: Timesheet,
    pub task: Task,
}
