use chrono::{DateTime, Utc};
use tock_core::entities::Timesheet;
use tock_db::error::DatabaseError;

use crate::cli::GlobalFlags;
use crate::commands::shared::task_ref::resolve_task;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    task: &str,
    start: DateTime<Utc>,
    stop: Option<DateTime<Utc>>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let task = resolve_task(ctx, task, false).await?;
    let draft = Timesheet {
        stop_time: stop,
        ..Timesheet::open(task.id, start)
    };

    let timesheet = match ctx.service.create_timesheet(&draft).await {
        Ok(timesheet) => timesheet,
        Err(DatabaseError::AlreadyRunning { timesheet_id }) => anyhow::bail!(
            "timesheet {timesheet_id} is still running; stop it or pass --stop"
        ),
        Err(error) => return Err(error.into()),
    };
    output(&timesheet, flags.format)
}
