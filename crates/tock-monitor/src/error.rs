use thiserror::Error;

/// Errors from the monitor lifecycle.
///
/// Store failures never surface here: the poll loop records them in the
/// snapshot and keeps polling.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// `start` was called outside a tokio runtime.
    #[error("status monitor needs a tokio runtime")]
    NoRuntime,

    /// The poll loop task panicked or was aborted.
    #[error("poll loop failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
