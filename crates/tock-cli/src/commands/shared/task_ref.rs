use tock_core::entities::Task;
use tock_db::error::DatabaseError;
use tock_db::repos::TaskRef;

use crate::context::AppContext;

/// Interpret a command-line task argument: a number is an id, anything else
/// an exact synopsis.
#[must_use]
pub fn parse_task_ref(raw: &str) -> TaskRef<'_> {
    let raw = raw.trim();
    raw.parse::<i64>().map_or(TaskRef::Synopsis(raw), TaskRef::Id)
}

/// Load the task named by `raw`, with a readable error when none matches.
pub async fn resolve_task(ctx: &AppContext, raw: &str, include_deleted: bool) -> anyhow::Result<Task> {
    match ctx.service.load_task(parse_task_ref(raw), include_deleted).await {
        Ok(task) => Ok(task),
        Err(DatabaseError::NoResult) => anyhow::bail!("no task matches '{raw}'"),
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("12", TaskRef::Id(12))]
    #[case(" 7 ", TaskRef::Id(7))]
    #[case("Write report", TaskRef::Synopsis("Write report"))]
    #[case("  padded ", TaskRef::Synopsis("padded"))]
    #[case("12a", TaskRef::Synopsis("12a"))]
    fn task_arguments_parse(#[case] raw: &str, #[case] expected: TaskRef<'static>) {
        assert_eq!(parse_task_ref(raw), expected);
    }
}
