use tock_core::entities::Task;
use tock_db::error::DatabaseError;
use tock_db::repos::TaskRef;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StartArgs;
use crate::commands::shared::task_ref::parse_task_ref;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tock start`: stop whatever runs and time the given task.
pub async fn handle(args: &StartArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let task = find_or_create(ctx, &args.task, args.create).await?;
    let switch = ctx.service.switch_task(task.id).await?;

    if let Some(stopped) = &switch.stopped {
        tracing::debug!(id = stopped.id, "closed previous timesheet");
    }
    ctx.notify("Timing started", &task.synopsis);
    output(&switch, flags.format)
}

async fn find_or_create(ctx: &AppContext, raw: &str, create: bool) -> anyhow::Result<Task> {
    let task_ref = parse_task_ref(raw);
    match ctx.service.load_task(task_ref, false).await {
        Ok(task) => Ok(task),
        Err(DatabaseError::NoResult) => match task_ref {
            TaskRef::Synopsis(synopsis) if create => {
                Ok(ctx.service.create_task(&Task::new(synopsis, "")).await?)
            }
            TaskRef::Synopsis(_) => {
                anyhow::bail!("no task matches '{raw}'; pass --create to create it")
            }
            TaskRef::Id(id) => anyhow::bail!("no task with id {id}"),
        },
        Err(error) => Err(error.into()),
    }
}
