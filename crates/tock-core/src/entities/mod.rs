//! Entity structs for all tock domain objects.
//!
//! `Task` and `Timesheet` map to tables in the libSQL store. The remaining
//! types are read models assembled from queries. All structs derive
//! `Serialize` and `Deserialize` for JSON output.

mod report;
mod task;
mod timesheet;

pub use report::ReportRow;
pub use task::Task;
pub use timesheet::{Timesheet, TimesheetEntry};
