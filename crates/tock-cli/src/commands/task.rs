use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::context::AppContext;

mod create;
mod delete;
mod get;
mod list;
mod update;

/// Handle `tock task`.
pub async fn handle(
    action: &TaskCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TaskCommands::Create {
            synopsis,
            description,
        } => create::run(synopsis, description.as_deref(), ctx, flags).await,
        TaskCommands::Get {
            task,
            include_deleted,
        } => get::run(task, *include_deleted, ctx, flags).await,
        TaskCommands::Update {
            task,
            synopsis,
            description,
            undelete,
        } => {
            update::run(
                task,
                synopsis.as_deref(),
                description.as_deref(),
                *undelete,
                ctx,
                flags,
            )
            .await
        }
        TaskCommands::Delete { task } => delete::run(task, ctx, flags).await,
        TaskCommands::List {
            search,
            synopsis_only,
            include_deleted,
            limit,
        } => {
            list::run(
                search.as_deref(),
                *synopsis_only,
                *include_deleted,
                *limit,
                ctx,
                flags,
            )
            .await
        }
    }
}
