//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use tock_config::TockConfig;

#[test]
fn loads_store_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
path = "./tock.db"
busy_timeout_ms = 250
"#,
        )?;

        let config: TockConfig = Figment::from(Serialized::defaults(TockConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.store.path, "./tock.db");
        assert_eq!(config.store.busy_timeout_ms, 250);
        assert!(config.store.has_path());
        Ok(())
    });
}

#[test]
fn loads_monitor_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[monitor]
poll_interval_secs = 1
event_capacity = 4
"#,
        )?;

        let config: TockConfig = Figment::from(Serialized::defaults(TockConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.monitor.poll_interval_secs, 1);
        assert_eq!(config.monitor.event_capacity, 4);
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
default_limit = 100
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(TockConfig::default()))
            .merge(Toml::file("config.toml"));
        let config = TockConfig::from_figment(&figment).expect("config loads");

        assert_eq!(config.general.default_limit, 100);
        assert_eq!(config.general.recent_tasks, 5);
        assert_eq!(config.monitor.poll_interval_secs, 3);
        assert_eq!(config.store.busy_timeout_ms, 5000);
        Ok(())
    });
}

#[test]
fn from_figment_validates() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[monitor]
poll_interval_secs = 0
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(TockConfig::default()))
            .merge(Toml::file("config.toml"));
        assert!(TockConfig::from_figment(&figment).is_err());
        Ok(())
    });
}
