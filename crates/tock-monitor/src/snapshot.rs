use serde::Serialize;
use tock_core::entities::TimesheetEntry;
use tock_core::enums::RunStatus;

/// The monitor's cached view of the store.
///
/// `running_timesheet` is only set while `status` is `Running`;
/// `last_error` only while it is `Error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub status: RunStatus,
    pub running_timesheet: Option<TimesheetEntry>,
    pub last_error: Option<String>,
}

impl StatusSnapshot {
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn running(entry: TimesheetEntry) -> Self {
        Self {
            status: RunStatus::Running,
            running_timesheet: Some(entry),
            last_error: None,
        }
    }

    #[must_use]
    pub const fn error(message: String) -> Self {
        Self {
            status: RunStatus::Error,
            running_timesheet: None,
            last_error: Some(message),
        }
    }

    /// Derive the snapshot for a set of open timesheets.
    ///
    /// More than one open timesheet breaks the store invariant and is
    /// reported as an error rather than picking one.
    #[must_use]
    pub fn from_open(mut open: Vec<TimesheetEntry>) -> Self {
        match open.len() {
            0 => Self::idle(),
            1 => open.pop().map_or_else(Self::idle, Self::running),
            n => {
                let ids: Vec<String> = open.iter().map(|e| e.timesheet.id.to_string()).collect();
                Self::error(format!(
                    "inconsistent store: {n} open timesheets (ids {})",
                    ids.join(", ")
                ))
            }
        }
    }

    /// Id of the running timesheet, if any.
    #[must_use]
    pub fn running_id(&self) -> Option<i64> {
        self.running_timesheet.as_ref().map(|e| e.timesheet.id)
    }

    /// Whether moving from `self` to `next` is worth an event.
    #[must_use]
    pub fn differs_from(&self, next: &Self) -> bool {
        self.status != next.status || self.running_id() != next.running_id()
    }
}
