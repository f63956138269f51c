// src/config/model.rs

use serde::Deserialize;

/// Configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// interval = "300ms"
/// monitor = ["src", "*.toml"]
/// ignore = [".*", "target"]
/// recurse = true
/// verbose = false
/// ```
///
/// Every field is optional; whatever is missing falls back to the CLI flag
/// or the built-in default (see [`WatchConfig::resolve`]).
///
/// [`WatchConfig::resolve`]: crate::config::WatchConfig::resolve
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Duration string such as `"300ms"` or `"2s"`.
    #[serde(default)]
    pub interval: Option<String>,

    #[serde(default)]
    pub monitor: Option<Vec<String>>,

    #[serde(default)]
    pub ignore: Option<Vec<String>>,

    #[serde(default)]
    pub recurse: Option<bool>,

    #[serde(default)]
    pub verbose: Option<bool>,
}
