use crate::cli::GlobalFlags;
use crate::cli::root_commands::RecentArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output_list;

/// Handle `tock recent`.
pub async fn handle(args: &RecentArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = effective_limit(args.limit, flags.limit, ctx.config.general.recent_tasks);
    let tasks = ctx.service.last_started_tasks(limit).await?;
    output_list(&tasks, flags.format)
}
