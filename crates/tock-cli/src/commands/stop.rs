use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tock stop`. Nothing running is not an error.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match ctx.service.stop_running().await {
        Ok(stopped) => {
            ctx.notify("Timing stopped", &format!("timesheet {}", stopped.id));
            output(&stopped, flags.format)
        }
        Err(error) if error.is_no_running_task() => {
            if !flags.quiet {
                eprintln!("nothing is running");
            }
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}
