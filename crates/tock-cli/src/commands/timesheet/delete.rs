use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::{Row, output};

#[derive(Serialize)]
struct Deleted {
    id: i64,
    deleted: bool,
}

impl Row for Deleted {
    const HEADERS: &'static [&'static str] = &["id", "deleted"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.deleted.to_string()]
    }
}

pub async fn run(id: i64, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.service.delete_timesheet(id).await?;
    output(&Deleted { id, deleted: true }, flags.format)
}
