use crate::cli::GlobalFlags;
use crate::cli::subcommands::TimesheetCommands;
use crate::context::AppContext;

mod add;
mod delete;
mod list;
mod update;

/// Handle `tock timesheet`.
pub async fn handle(
    action: &TimesheetCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TimesheetCommands::List { task, open, limit } => {
            list::run(task.as_deref(), *open, *limit, ctx, flags).await
        }
        TimesheetCommands::Add { task, start, stop } => {
            add::run(task, *start, *stop, ctx, flags).await
        }
        TimesheetCommands::Update {
            id,
            task,
            start,
            stop,
            reopen,
        } => {
            let changes = update::Changes {
                task: task.as_deref(),
                start: *start,
                stop: *stop,
                reopen: *reopen,
            };
            update::run(*id, changes, ctx, flags).await
        }
        TimesheetCommands::Delete { id } => delete::run(*id, ctx, flags).await,
    }
}
