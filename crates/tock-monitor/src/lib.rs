//! # tock-monitor
//!
//! Background reconciliation of the run status and the bus it is published on.
//!
//! A [`StatusMonitor`] polls a [`TimesheetSource`] on a fixed interval, derives
//! `idle`/`running`/`error` from the open timesheets it finds, caches the
//! result in a [`StatusSnapshot`] and publishes a [`StatusEvent`] on its
//! [`EventBus`] whenever the status or the running timesheet changes.

pub mod bus;
pub mod error;
pub mod monitor;
pub mod snapshot;
pub mod source;

pub use bus::{BusMessage, EventBus, EventHandler, StatusEvent, Subscription};
pub use error::MonitorError;
pub use monitor::StatusMonitor;
pub use snapshot::StatusSnapshot;
pub use source::TimesheetSource;
