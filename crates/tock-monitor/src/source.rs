//! Where the monitor reads open timesheets from.

use std::sync::Arc;

use async_trait::async_trait;
use tock_core::entities::TimesheetEntry;
use tock_db::error::DatabaseError;
use tock_db::service::TockService;

/// Read access to the open timesheets.
///
/// `TockService` is the production source; tests substitute doubles that
/// fail or return inconsistent data on demand.
#[async_trait]
pub trait TimesheetSource: Send + Sync {
    /// All open timesheets joined with their tasks, oldest first.
    async fn search_open(&self) -> Result<Vec<TimesheetEntry>, DatabaseError>;
}

#[async_trait]
impl TimesheetSource for TockService {
    async fn search_open(&self) -> Result<Vec<TimesheetEntry>, DatabaseError> {
        Self::search_open(self).await
    }
}

#[async_trait]
impl<T: TimesheetSource + ?Sized> TimesheetSource for Arc<T> {
    async fn search_open(&self) -> Result<Vec<TimesheetEntry>, DatabaseError> {
        (**self).search_open().await
    }
}
