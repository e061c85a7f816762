mod task;
mod timesheet;

pub use task::TaskCommands;
pub use timesheet::TimesheetCommands;
