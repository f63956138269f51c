// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::RawConfigFile;
use crate::errors::{Result, WatchrunError};

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "Watchrun.toml";

/// Load and deserialize a configuration file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|err| {
        WatchrunError::ConfigError(format!("cannot read config file {}: {err}", path.display()))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load the config file for this run, if there is one.
///
/// - An explicit path must exist.
/// - Otherwise [`DEFAULT_CONFIG_FILE`] is read when it exists in `dir`.
pub fn load_optional(explicit: Option<&str>, dir: &Path) -> Result<Option<RawConfigFile>> {
    if let Some(path) = explicit {
        return load_from_path(path).map(Some);
    }

    let fallback = default_config_path(dir);
    if fallback.is_file() {
        debug!(path = %fallback.display(), "using config file from working directory");
        return load_from_path(&fallback).map(Some);
    }

    Ok(None)
}

pub fn default_config_path(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_CONFIG_FILE)
}
