//! Shared test utilities for tock-db unit tests.

pub(crate) mod helpers {
    use tock_core::entities::Task;

    use crate::service::TockService;
    use crate::{DEFAULT_BUSY_TIMEOUT, MEMORY_PATH};

    /// Create an in-memory `TockService`.
    pub async fn test_service() -> TockService {
        TockService::new_local(MEMORY_PATH, DEFAULT_BUSY_TIMEOUT)
            .await
            .unwrap()
    }

    /// Persist a task with an empty description and return it.
    pub async fn create_test_task(svc: &TockService, synopsis: &str) -> Task {
        svc.create_task(&Task::new(synopsis, "")).await.unwrap()
    }
}
