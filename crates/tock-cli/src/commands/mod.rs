pub mod dispatch;
pub mod recent;
pub mod report;
pub mod shared;
pub mod start;
pub mod status;
pub mod stop;
pub mod task;
pub mod timesheet;
pub mod watch;
