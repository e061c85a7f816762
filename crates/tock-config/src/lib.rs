//! # tock-config
//!
//! Layered configuration loading for tock using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TOCK_*` prefix, `__` as separator)
//! 2. Project-level `.tock/config.toml`
//! 3. User-level `~/.config/tock/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TOCK_STORE__PATH` -> `store.path`,
//! `TOCK_MONITOR__POLL_INTERVAL_SECS` -> `monitor.poll_interval_secs`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use tock_config::TockConfig;
//!
//! let config = TockConfig::load_with_dotenv().expect("config");
//! println!("polling every {:?}", config.monitor.poll_interval());
//! ```

mod error;
mod general;
mod monitor;
mod store;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use monitor::MonitorConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TockConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TockConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading a `.env` file from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer more providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".tock/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("TOCK_").split("__"))
    }

    /// Reject values the runtime cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "monitor.poll_interval_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.monitor.event_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "monitor.event_capacity".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tock").join("config.toml"))
    }
}
