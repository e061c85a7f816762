use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tock status`: reconcile once and print the snapshot.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let monitor = ctx.monitor(ctx.config.monitor.poll_interval());
    let status = monitor.reconcile().await;
    tracing::debug!(%status, "reconciled status");

    output(&monitor.snapshot(), flags.format)
}
