use tock_core::entities::Task;
use tock_db::error::DatabaseError;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    synopsis: &str,
    description: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let draft = Task::new(synopsis, description.unwrap_or_default());
    let task = match ctx.service.create_task(&draft).await {
        Ok(task) => task,
        Err(DatabaseError::UniqueViolation(_)) => {
            anyhow::bail!("a task named '{}' already exists", synopsis.trim())
        }
        Err(error) => return Err(error.into()),
    };
    output(&task, flags.format)
}
