pub mod limit;
pub mod task_ref;
