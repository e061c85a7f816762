//! Persistent store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default time a connection waits on a locked database, in milliseconds.
const fn default_busy_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path to the libSQL database file. Empty means the platform data dir.
    #[serde(default)]
    pub path: String,

    /// How long a write waits for another process's transaction to finish.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl StoreConfig {
    /// Whether an explicit database path was configured.
    #[must_use]
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    /// Resolve the database file location.
    ///
    /// Falls back to `<data dir>/tock/tock.db` (e.g. `~/.local/share/tock/tock.db`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoDataDir` when no path is configured and the
    /// platform has no data directory.
    pub fn resolved_path(&self) -> Result<PathBuf, ConfigError> {
        if self.has_path() {
            return Ok(PathBuf::from(&self.path));
        }
        dirs::data_dir()
            .map(|dir| dir.join("tock").join("tock.db"))
            .ok_or(ConfigError::NoDataDir)
    }
}
