use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Time spent on one task during one (UTC) day, summed over closed timesheets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRow {
    pub day: NaiveDate,
    pub task_id: i64,
    pub synopsis: String,
    pub timesheets: u32,
    pub duration_secs: i64,
}
