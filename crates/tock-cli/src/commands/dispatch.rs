use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Task { action } => commands::task::handle(&action, ctx, flags).await,
        Commands::Start(args) => commands::start::handle(&args, ctx, flags).await,
        Commands::Stop => commands::stop::handle(ctx, flags).await,
        Commands::Status => commands::status::handle(ctx, flags).await,
        Commands::Timesheet { action } => commands::timesheet::handle(&action, ctx, flags).await,
        Commands::Recent(args) => commands::recent::handle(&args, ctx, flags).await,
        Commands::Report(args) => commands::report::handle(&args, ctx, flags).await,
        Commands::Watch(args) => commands::watch::handle(&args, ctx, flags).await,
    }
}
