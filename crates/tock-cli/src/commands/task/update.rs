use tock_db::error::DatabaseError;

use crate::cli::GlobalFlags;
use crate::commands::shared::task_ref::resolve_task;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    task: &str,
    synopsis: Option<&str>,
    description: Option<&str>,
    undelete: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut current = resolve_task(ctx, task, undelete).await?;
    if let Some(synopsis) = synopsis {
        current.synopsis = synopsis.to_string();
    }
    if let Some(description) = description {
        current.description = description.to_string();
    }
    if undelete {
        current.deleted_at = None;
    }

    let updated = match ctx.service.update_task(&current, undelete).await {
        Ok(task) => task,
        Err(DatabaseError::UniqueViolation(_)) => {
            anyhow::bail!("a task named '{}' already exists", current.synopsis.trim())
        }
        Err(error) => return Err(error.into()),
    };
    output(&updated, flags.format)
}
