use tock_config::TockConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<TockConfig> {
    let mut config = TockConfig::load_with_dotenv()?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn apply_overrides(config: &mut TockConfig, flags: &GlobalFlags) {
    if let Some(db) = &flags.db {
        tracing::debug!(db, "database path overridden on the command line");
        config.store.path.clone_from(db);
    }
}
