use crate::cli::GlobalFlags;
use crate::commands::shared::task_ref::resolve_task;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    task: &str,
    include_deleted: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let task = resolve_task(ctx, task, include_deleted).await?;
    output(&task, flags.format)
}
