use chrono::{DateTime, Utc};
use tock_db::error::DatabaseError;

use crate::cli::GlobalFlags;
use crate::commands::shared::task_ref::resolve_task;
use crate::context::AppContext;
use crate::output::output;

/// Requested corrections; unset fields keep their stored value.
pub struct Changes<'a> {
    pub task: Option<&'a str>,
    pub start: Option<DateTime<Utc>>,
    pub stop: Option<DateTime<Utc>>,
    pub reopen: bool,
}

pub async fn run(
    id: i64,
    changes: Changes<'_>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut timesheet = ctx.service.load_timesheet(id).await?;
    if let Some(task) = changes.task {
        timesheet.task_id = resolve_task(ctx, task, false).await?.id;
    }
    if let Some(start) = changes.start {
        timesheet.start_time = start;
    }
    if changes.reopen {
        timesheet.stop_time = None;
    } else if let Some(stop) = changes.stop {
        timesheet.stop_time = Some(stop);
    }

    let updated = match ctx.service.update_timesheet(&timesheet).await {
        Ok(timesheet) => timesheet,
        Err(DatabaseError::AlreadyRunning { timesheet_id }) => {
            anyhow::bail!("cannot reopen: timesheet {timesheet_id} is running")
        }
        Err(error) => return Err(error.into()),
    };
    output(&updated, flags.format)
}
