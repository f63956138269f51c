// src/config/mod.rs

//! Configuration.
//!
//! - [`model`] is the optional TOML file.
//! - [`loader`] finds and reads it.
//! - [`WatchConfig`] is the resolved, immutable value built once at startup
//!   from CLI flags, the file and the defaults, in that order of priority.

pub mod loader;
pub mod model;

use std::time::Duration;

use crate::cli::CliArgs;
use crate::errors::{Result, WatchrunError};

pub use loader::{load_from_path, load_optional, DEFAULT_CONFIG_FILE};
pub use model::{RawConfigFile, WatchSection};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(300);
pub const DEFAULT_MONITOR: &str = ".";
pub const DEFAULT_IGNORE: &str = "~*;.*;*~;*.exe";

/// Resolved watch options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Debounce window for change notifications.
    pub interval: Duration,
    /// Files, folders or globs to monitor.
    pub monitor: Vec<String>,
    /// Globs matched against path component names to ignore.
    pub ignore: Vec<String>,
    /// Whether monitored folders are watched recursively.
    pub recurse: bool,
    /// Print options and steps at startup.
    pub verbose: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            monitor: split_patterns(DEFAULT_MONITOR),
            ignore: split_patterns(DEFAULT_IGNORE),
            recurse: true,
            verbose: false,
        }
    }
}

impl WatchConfig {
    /// Merge CLI flags over the optional config file over the defaults.
    pub fn resolve(file: Option<&RawConfigFile>, cli: &CliArgs) -> Result<Self> {
        let defaults = Self::default();
        let section = file.map(|f| &f.watch);

        let interval = match cli
            .interval
            .as_deref()
            .or_else(|| section.and_then(|s| s.interval.as_deref()))
        {
            Some(s) => parse_duration(s).map_err(WatchrunError::ConfigError)?,
            None => defaults.interval,
        };

        let monitor = match &cli.monitor {
            Some(s) => split_patterns(s),
            None => section
                .and_then(|s| s.monitor.clone())
                .unwrap_or(defaults.monitor),
        };

        let ignore = match &cli.ignore {
            Some(s) => split_patterns(s),
            None => section
                .and_then(|s| s.ignore.clone())
                .unwrap_or(defaults.ignore),
        };

        let recurse = cli
            .recurse
            .or_else(|| section.and_then(|s| s.recurse))
            .unwrap_or(defaults.recurse);

        let verbose = cli.verbose || section.and_then(|s| s.verbose).unwrap_or(defaults.verbose);

        let config = Self {
            interval,
            monitor,
            ignore,
            recurse,
            verbose,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(WatchrunError::ConfigError(
                "interval must be greater than zero".to_string(),
            ));
        }
        if self.monitor.iter().all(|p| p.trim().is_empty()) {
            return Err(WatchrunError::ConfigError(
                "at least one monitor pattern is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split a pattern list given as one string. Both `;` and `:` separate
/// entries; empty entries are dropped.
pub fn split_patterns(s: &str) -> Vec<String> {
    s.split([';', ':'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a simple duration string like `"300ms"`, `"3s"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| format!("duration '{s}' is missing a unit suffix (ms, s, m, h)"))?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{num_part}': {e}"))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{unit}'; expected ms, s, m, or h"
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{s}' is too large"))
}
