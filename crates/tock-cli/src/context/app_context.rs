use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tock_config::TockConfig;
use tock_db::service::TockService;
use tock_monitor::StatusMonitor;

use crate::notify::{self, Notifier, TracingNotifier};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<TockService>,
    pub config: TockConfig,
    pub notifier: Arc<dyn Notifier>,
    pub db_path: PathBuf,
}

impl AppContext {
    /// Open the configured store, creating its directory on first use.
    pub async fn init(config: TockConfig) -> anyhow::Result<Self> {
        let db_path = config.store.resolved_path()?;
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let busy_timeout = Duration::from_millis(config.store.busy_timeout_ms);
        let service = TockService::new_local(&db_path.to_string_lossy(), busy_timeout)
            .await
            .with_context(|| format!("failed to open tock database at {}", db_path.display()))?;

        Ok(Self {
            service: Arc::new(service),
            config,
            notifier: Arc::new(TracingNotifier),
            db_path,
        })
    }

    /// A status monitor over this context's store, polling every `interval`.
    #[must_use]
    pub fn monitor(&self, interval: Duration) -> StatusMonitor {
        StatusMonitor::new(
            self.service.clone(),
            interval,
            self.config.monitor.event_capacity,
        )
    }

    /// Send a notification; failures are logged and otherwise ignored.
    pub fn notify(&self, title: &str, message: &str) {
        notify::send(self.notifier.as_ref(), title, message);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;
    use tock_config::TockConfig;

    use super::AppContext;

    /// A context over a fresh database below `dir`.
    pub async fn test_context(dir: &TempDir) -> AppContext {
        let mut config = TockConfig::default();
        config.store.path = dir
            .path()
            .join("data")
            .join("tock.db")
            .to_string_lossy()
            .into_owned();
        AppContext::init(config).await.unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::test_context;

    #[tokio::test]
    async fn init_creates_store_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(&dir).await;

        assert!(dir.path().join("data").is_dir());
        assert!(ctx.db_path.ends_with("data/tock.db"));
        assert!(ctx.service.load_all_tasks(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn monitor_reads_the_context_store() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(&dir).await;
        let task = ctx
            .service
            .create_task(&tock_core::entities::Task::new("A", ""))
            .await
            .unwrap();
        ctx.service.switch_task(task.id).await.unwrap();

        let monitor = ctx.monitor(std::time::Duration::from_secs(1));
        assert_eq!(
            monitor.reconcile().await,
            tock_core::enums::RunStatus::Running
        );
    }
}
