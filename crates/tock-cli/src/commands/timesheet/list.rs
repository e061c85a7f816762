use tock_core::entities::TimesheetEntry;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::task_ref::resolve_task;
use crate::context::AppContext;
use crate::output::output_list;

pub async fn run(
    task: Option<&str>,
    open: bool,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = effective_limit(limit, flags.limit, ctx.config.general.default_limit);

    let mut entries: Vec<TimesheetEntry> = if open {
        ctx.service.search_open().await?
    } else if let Some(task) = task {
        let task = resolve_task(ctx, task, true).await?;
        ctx.service
            .timesheets_for_task(task.id)
            .await?
            .into_iter()
            .map(|timesheet| TimesheetEntry {
                timesheet,
                task: task.clone(),
            })
            .collect()
    } else {
        ctx.service.load_all_timesheets().await?
    };
    entries.truncate(usize::try_from(limit)?);
    output_list(&entries, flags.format)
}
