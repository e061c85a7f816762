use crate::cli::GlobalFlags;
use crate::commands::shared::task_ref::resolve_task;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(task: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let task = resolve_task(ctx, task, false).await?;
    let deleted = ctx.service.delete_task(task.id).await?;
    output(&deleted, flags.format)
}
