use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tokio::sync::oneshot;
use tock_core::enums::RunStatus;
use tock_monitor::{EventHandler, StatusEvent};

use crate::cli::root_commands::WatchArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::instance_lock;
use crate::notify::{self, Notifier};
use crate::output::render;
use crate::output::views::StatusLine;

/// Handle `tock watch`: print every status change until ctrl-c.
pub async fn handle(args: &WatchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let interval = args
        .interval
        .map_or_else(|| ctx.config.monitor.poll_interval(), Duration::from_secs);
    if interval.is_zero() {
        anyhow::bail!("--interval must be at least one second");
    }

    let lock_dir = ctx.db_path.parent().unwrap_or_else(|| Path::new("."));
    let _lock = instance_lock::acquire(lock_dir)?;

    let monitor = ctx.monitor(interval);
    let printer = WatchPrinter {
        format: flags.format,
        notifier: Arc::clone(&ctx.notifier),
        last: RunStatus::Idle,
    };
    let printing = monitor.subscribe().spawn(printer);

    let (ready, ready_rx) = oneshot::channel();
    monitor.start(Some(ready_rx))?;
    let _ = ready.send(());
    if !flags.quiet {
        eprintln!("watching {} (ctrl-c to stop)", ctx.db_path.display());
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    monitor.close().await?;
    printing.await?;
    Ok(())
}

struct WatchPrinter {
    format: OutputFormat,
    notifier: Arc<dyn Notifier>,
    last: RunStatus,
}

impl WatchPrinter {
    fn line(&self, event: &StatusEvent) -> anyhow::Result<String> {
        if self.format == OutputFormat::Table {
            return Ok(StatusLine::from_event(event, Utc::now()).to_string());
        }
        render(event, self.format)
    }
}

impl EventHandler for WatchPrinter {
    fn on_next(&mut self, event: StatusEvent) {
        match self.line(&event) {
            Ok(line) => println!("{line}"),
            Err(error) => tracing::warn!(%error, "failed to render status event"),
        }

        match (&event.running_timesheet, event.status) {
            (Some(entry), RunStatus::Running) => {
                notify::send(self.notifier.as_ref(), "Timing", &entry.task.synopsis);
            }
            (_, RunStatus::Idle) if self.last == RunStatus::Running => {
                notify::send(self.notifier.as_ref(), "Timing stopped", "nothing is running");
            }
            _ => {}
        }
        self.last = event.status;
    }

    fn on_error(&mut self, message: &str) {
        eprintln!("status error: {message}");
        notify::send(self.notifier.as_ref(), "tock error", message);
    }

    fn on_closed(&mut self) {
        tracing::debug!("status stream closed");
    }
}
