//! Status monitor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default delay between poll ticks, in seconds.
const fn default_poll_interval_secs() -> u64 {
    3
}

/// Default per-subscriber event queue capacity.
const fn default_event_capacity() -> usize {
    16
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Delay between two reconciliations of the store.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Bounded queue size for each event subscriber.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl MonitorConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = MonitorConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(3));
        assert_eq!(config.event_capacity, 16);
    }
}
