//! Bounded fan-out of status events.
//!
//! Every subscriber gets its own bounded `mpsc` queue. Publishing waits for
//! room in each queue in turn, so a slow subscriber delays the publisher
//! (and with it the next poll tick) instead of losing events.

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tock_core::entities::TimesheetEntry;
use tock_core::enums::RunStatus;

/// Payload published on every status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEvent {
    pub status: RunStatus,
    pub running_timesheet: Option<TimesheetEntry>,
}

/// What a subscriber receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusMessage {
    Next(StatusEvent),
    Error(String),
}

#[derive(Default)]
struct Subscribers {
    senders: Vec<mpsc::Sender<BusMessage>>,
    closed: bool,
}

/// Single-producer, multi-subscriber broadcast over bounded queues.
pub struct EventBus {
    capacity: usize,
    subscribers: Mutex<Subscribers>,
}

impl EventBus {
    /// Create a bus whose per-subscriber queues hold `capacity` messages.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            subscribers: Mutex::new(Subscribers::default()),
        }
    }

    /// Attach a new subscriber. It only sees messages published from now on.
    ///
    /// Subscribing to a closed bus yields an already-ended subscription.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.capacity);
        let mut subscribers = self.subscribers.lock();
        if !subscribers.closed {
            subscribers.senders.push(tx);
        }
        Subscription { rx }
    }

    /// Deliver `event` to every live subscriber, in subscription order.
    pub async fn publish(&self, event: StatusEvent) {
        self.broadcast(BusMessage::Next(event)).await;
    }

    /// Deliver an error signal to every live subscriber.
    pub async fn publish_error(&self, message: impl Into<String>) {
        self.broadcast(BusMessage::Error(message.into())).await;
    }

    /// End every subscription; later publishes are dropped.
    pub fn close(&self) {
        let mut subscribers = self.subscribers.lock();
        subscribers.closed = true;
        subscribers.senders.clear();
        tracing::debug!("event bus closed");
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.subscribers.lock().closed
    }

    /// Number of subscribers that have not gone away yet.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.senders.retain(|tx| !tx.is_closed());
        subscribers.senders.len()
    }

    async fn broadcast(&self, message: BusMessage) {
        // Senders are cloned out so the lock is not held while waiting for room.
        let senders = self.subscribers.lock().senders.clone();
        let mut dropped = 0usize;
        for tx in &senders {
            if tx.send(message.clone()).await.is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            self.subscribers.lock().senders.retain(|tx| !tx.is_closed());
            tracing::debug!(dropped, "pruned closed subscribers");
        }
    }
}

/// Receiving end of one subscriber's queue.
pub struct Subscription {
    rx: mpsc::Receiver<BusMessage>,
}

impl Subscription {
    /// Next message, or `None` once the bus is closed and the queue drained.
    pub async fn recv(&mut self) -> Option<BusMessage> {
        self.rx.recv().await
    }

    /// Drive `handler` from this subscription on a new task until the bus closes.
    pub fn spawn<H>(mut self, mut handler: H) -> JoinHandle<()>
    where
        H: EventHandler + Send + 'static,
    {
        tokio::spawn(async move {
            while let Some(message) = self.recv().await {
                match message {
                    BusMessage::Next(event) => handler.on_next(event),
                    BusMessage::Error(message) => handler.on_error(&message),
                }
            }
            handler.on_closed();
        })
    }
}

/// Callbacks for a subscriber driven by [`Subscription::spawn`].
pub trait EventHandler {
    fn on_next(&mut self, event: StatusEvent);

    fn on_error(&mut self, message: &str) {
        tracing::debug!(message, "status error signal ignored");
    }

    fn on_closed(&mut self) {}
}
