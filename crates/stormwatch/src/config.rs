//! CLI configuration: thin wrapper around `stormwatch_config`.
//!
//! Adds the `GlobalOpts` overrides (--config, --store) on top of the shared
//! loader and maps errors into `CliError`.

use std::path::PathBuf;

use stormwatch_core::EngineConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use stormwatch_config::{Config, save_config, to_toml};

/// Config file in use: `--config` / `STORMWATCH_CONFIG`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(stormwatch_config::config_path)
}

/// Load the layered config for this invocation.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_path(global);
    stormwatch_config::load_config(Some(&path)).map_err(|e| CliError::from_config(e, &path))
}

/// Subscriber file: `--store` beats `[store] path` beats the platform default.
pub fn store_path(global: &GlobalOpts, cfg: &Config) -> PathBuf {
    global
        .store
        .clone()
        .unwrap_or_else(|| stormwatch_config::store_path(cfg))
}

/// Resolve credentials and build the engine's runtime config.
pub fn engine_config(global: &GlobalOpts, cfg: &Config) -> Result<EngineConfig, CliError> {
    stormwatch_config::to_engine_config(cfg).map_err(|e| CliError::from_config(e, &config_path(global)))
}
