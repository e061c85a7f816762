//! Repository modules implementing store operations for tock entities.
//!
//! Each module adds methods to `TockService` via `impl TockService` blocks.

pub mod report;
pub mod task;
pub mod timesheet;

pub use task::TaskRef;
pub use timesheet::TaskSwitch;
