use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output_list;

pub async fn run(
    search: Option<&str>,
    synopsis_only: bool,
    include_deleted: bool,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = effective_limit(limit, flags.limit, ctx.config.general.default_limit);

    let mut tasks = match search {
        Some(text) if synopsis_only => ctx.service.search_tasks_by_synopsis(text).await?,
        Some(text) => ctx.service.search_tasks(text).await?,
        None => ctx.service.load_all_tasks(include_deleted).await?,
    };
    tasks.truncate(usize::try_from(limit)?);

    output_list(&tasks, flags.format)
}
