/// Delivers short titled messages to the user out of band.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str) -> anyhow::Result<()>;
}

/// Default notifier: records notifications in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str) -> anyhow::Result<()> {
        tracing::info!(title, message, "notification");
        Ok(())
    }
}

/// Send through `notifier`, logging instead of failing.
pub fn send(notifier: &dyn Notifier, title: &str, message: &str) {
    if let Err(error) = notifier.notify(title, message) {
        tracing::warn!(%error, title, "notification failed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Failing {
        attempts: Mutex<u32>,
    }

    impl Notifier for Failing {
        fn notify(&self, _title: &str, _message: &str) -> anyhow::Result<()> {
            *self.attempts.lock().unwrap() += 1;
            anyhow::bail!("no notification daemon")
        }
    }

    #[test]
    fn failures_are_not_fatal() {
        let notifier = Failing::default();
        send(&notifier, "tock", "started");
        assert_eq!(*notifier.attempts.lock().unwrap(), 1);
    }

    #[test]
    fn tracing_notifier_succeeds() {
        assert!(TracingNotifier.notify("tock", "started").is_ok());
    }
}
