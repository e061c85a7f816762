use chrono::{DateTime, Utc};
use clap::Subcommand;

/// Timesheet commands. Times are RFC 3339, e.g. `2026-03-02T09:00:00Z`.
#[derive(Clone, Debug, Subcommand)]
pub enum TimesheetCommands {
    /// List timesheets, newest first.
    List {
        /// Only timesheets of this task.
        #[arg(long)]
        task: Option<String>,
        /// Only the open timesheet.
        #[arg(long, conflicts_with = "task")]
        open: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Record a timesheet by hand. Without `--stop` it stays open.
    Add {
        task: String,
        #[arg(long)]
        start: DateTime<Utc>,
        #[arg(long)]
        stop: Option<DateTime<Utc>>,
    },
    /// Correct a timesheet.
    Update {
        id: i64,
        #[arg(long)]
        task: Option<String>,
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        #[arg(long)]
        stop: Option<DateTime<Utc>>,
        /// Clear the stop time.
        #[arg(long, conflicts_with = "stop")]
        reopen: bool,
    },
    /// Delete a timesheet.
    Delete { id: i64 },
}
