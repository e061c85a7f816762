use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::cli::subcommands::{TaskCommands, TimesheetCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Stop whatever is running and start timing a task.
    Start(StartArgs),
    /// Stop the running timesheet.
    Stop,
    /// Show the current run status.
    Status,
    /// Timesheets.
    Timesheet {
        #[command(subcommand)]
        action: TimesheetCommands,
    },
    /// Tasks most recently worked on.
    Recent(RecentArgs),
    /// Time per day and task.
    Report(ReportArgs),
    /// Follow status changes until interrupted.
    Watch(WatchArgs),
}

/// Arguments for `tock start`.
#[derive(Clone, Debug, Args)]
pub struct StartArgs {
    /// Task id or synopsis.
    pub task: String,
    /// Create the task if no task has this synopsis.
    #[arg(long)]
    pub create: bool,
}

/// Arguments for `tock recent`.
#[derive(Clone, Debug, Args)]
pub struct RecentArgs {
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Arguments for `tock report`.
#[derive(Clone, Debug, Args)]
pub struct ReportArgs {
    /// First UTC day to include (defaults to six days before `--to`).
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last UTC day to include (defaults to today).
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Count timesheets of deleted tasks too.
    #[arg(long)]
    pub include_deleted: bool,
}

/// Arguments for `tock watch`.
#[derive(Clone, Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in seconds (defaults to the configured interval).
    #[arg(long)]
    pub interval: Option<u64>,
}
