//! The status monitor: a poll loop that reconciles the cached run status
//! with the store.
//!
//! ```text
//! start(ready?) ──► wait for ready ──► tick ──► sleep(interval) ──► tick ...
//!                                        ▲            │
//!                        stop() ─────────┴── shutdown ┘ (wins the race)
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tock_core::entities::TimesheetEntry;
use tock_core::enums::RunStatus;

use crate::bus::{EventBus, StatusEvent, Subscription};
use crate::error::MonitorError;
use crate::snapshot::StatusSnapshot;
use crate::source::TimesheetSource;

struct Shared {
    source: Arc<dyn TimesheetSource>,
    interval: Duration,
    snapshot: RwLock<StatusSnapshot>,
    bus: EventBus,
    /// Held for a whole tick so observations land and publish in order.
    ticking: tokio::sync::Mutex<()>,
}

struct PollLoop {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Keeps a cached [`StatusSnapshot`] in step with the store and publishes
/// every transition on its [`EventBus`].
///
/// Each monitor owns its own state; several can run side by side.
pub struct StatusMonitor {
    shared: Arc<Shared>,
    poll: Mutex<Option<PollLoop>>,
}

impl StatusMonitor {
    /// Create an idle monitor. Nothing is polled until [`Self::start`].
    pub fn new(
        source: Arc<dyn TimesheetSource>,
        interval: Duration,
        event_capacity: usize,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                interval,
                snapshot: RwLock::new(StatusSnapshot::idle()),
                bus: EventBus::new(event_capacity),
                ticking: tokio::sync::Mutex::new(()),
            }),
            poll: Mutex::new(None),
        }
    }

    /// Spawn the poll loop on the current tokio runtime.
    ///
    /// When `ready` is given, the first tick waits until it fires (or its
    /// sender is dropped), so callers can finish subscribing first. Calling
    /// `start` on a running monitor logs and returns.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::NoRuntime` outside a tokio runtime.
    pub fn start(&self, ready: Option<oneshot::Receiver<()>>) -> Result<(), MonitorError> {
        let runtime = Handle::try_current().map_err(|_| MonitorError::NoRuntime)?;
        let mut poll = self.poll.lock();
        if poll.as_ref().is_some_and(|p| !p.task.is_finished()) {
            tracing::info!("status monitor already running");
            return Ok(());
        }

        let (shutdown, shutdown_rx) = oneshot::channel();
        let task = runtime.spawn(run_loop(Arc::clone(&self.shared), ready, shutdown_rx));
        *poll = Some(PollLoop { shutdown, task });
        Ok(())
    }

    /// Signal the poll loop to exit and wait for it.
    ///
    /// The loop finishes the tick in progress, if any, and otherwise exits
    /// without waiting out its sleep. A monitor that is not running is left
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Join` if the loop task panicked.
    pub async fn stop(&self) -> Result<(), MonitorError> {
        let Some(poll) = self.poll.lock().take() else {
            return Ok(());
        };
        // The loop may already be gone; then there is nobody to signal.
        let _ = poll.shutdown.send(());
        poll.task.await?;
        tracing::info!("status monitor stopped");
        Ok(())
    }

    /// Stop the loop and end every subscription.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Join` if the loop task panicked; the bus is
    /// closed either way.
    pub async fn close(&self) -> Result<(), MonitorError> {
        let stopped = self.stop().await;
        self.shared.bus.close();
        stopped
    }

    /// Run one reconciliation now, outside the poll loop.
    ///
    /// Waits for a tick already in progress, so there is never more than one
    /// writer of the snapshot.
    pub async fn reconcile(&self) -> RunStatus {
        self.shared.tick().await
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.poll
            .lock()
            .as_ref()
            .is_some_and(|p| !p.task.is_finished())
    }

    #[must_use]
    pub fn timesheet_status(&self) -> RunStatus {
        self.shared.snapshot.read().status
    }

    /// Message of the failure behind an `Error` status.
    #[must_use]
    pub fn timesheet_error(&self) -> Option<String> {
        self.shared.snapshot.read().last_error.clone()
    }

    #[must_use]
    pub fn running_timesheet(&self) -> Option<TimesheetEntry> {
        self.shared.snapshot.read().running_timesheet.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        self.shared.snapshot.read().clone()
    }

    /// Subscribe to transitions published from now on.
    pub fn subscribe(&self) -> Subscription {
        self.shared.bus.subscribe()
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.shared.interval
    }
}

impl Shared {
    async fn observe(&self) -> StatusSnapshot {
        match self.source.search_open().await {
            Ok(open) => StatusSnapshot::from_open(open),
            Err(e) if e.is_no_running_task() => StatusSnapshot::idle(),
            Err(e) => {
                tracing::warn!(error = %e, "status poll failed");
                StatusSnapshot::error(e.to_string())
            }
        }
    }

    async fn tick(&self) -> RunStatus {
        let _ticking = self.ticking.lock().await;
        let next = self.observe().await;
        let status = next.status;

        let event = {
            let mut current = self.snapshot.write();
            let changed = current.differs_from(&next);
            *current = next.clone();
            changed.then(|| StatusEvent {
                status,
                running_timesheet: next.running_timesheet.clone(),
            })
        };

        let Some(event) = event else {
            tracing::debug!(%status, "status unchanged");
            return status;
        };

        tracing::info!(
            %status,
            running = ?next.running_id(),
            "status changed"
        );
        self.bus.publish(event).await;
        if let Some(message) = next.last_error {
            self.bus.publish_error(message).await;
        }
        status
    }
}

async fn run_loop(
    shared: Arc<Shared>,
    ready: Option<oneshot::Receiver<()>>,
    mut shutdown: oneshot::Receiver<()>,
) {
    if let Some(ready) = ready {
        tokio::select! {
            biased;
            _ = &mut shutdown => return,
            _ = ready => {}
        }
    }

    tracing::info!(interval_ms = shared.interval.as_millis(), "status monitor started");
    loop {
        shared.tick().await;
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            () = tokio::time::sleep(shared.interval) => {}
        }
    }
}
