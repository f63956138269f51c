// src/watch/patterns.rs

use std::fmt;
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::errors::{Result, WatchrunError};
use crate::watch::path_utils::{join_clean, relative_str, to_slash};

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// One `monitor` entry: a directory/file to register with the OS watcher
/// plus, for glob entries, the glob a changed path has to match.
#[derive(Clone)]
struct MonitorEntry {
    pattern: String,
    root: PathBuf,
    glob: Option<GlobMatcher>,
}

impl MonitorEntry {
    fn compile(base: &Path, pattern: &str) -> Result<Self> {
        if !pattern.contains(GLOB_META) {
            return Ok(Self {
                pattern: pattern.to_string(),
                root: join_clean(base, pattern),
                glob: None,
            });
        }

        let literal_prefix: Vec<&str> = pattern
            .split('/')
            .take_while(|part| !part.contains(GLOB_META))
            .collect();

        Ok(Self {
            pattern: pattern.to_string(),
            root: join_clean(base, &literal_prefix.join("/")),
            glob: Some(Glob::new(pattern)?.compile_matcher()),
        })
    }

    fn covers(&self, path: &Path, rel: &str) -> bool {
        match &self.glob {
            Some(glob) => path.starts_with(&self.root) && glob.is_match(rel),
            None => path.starts_with(&self.root),
        }
    }

    /// The part of `path` below this entry's root.
    fn below_root<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Decides which filesystem events count as a change.
///
/// Patterns are evaluated against paths relative to `base` (forward
/// slashes):
///
/// - `monitor = [".", "*.toml"]`: a literal entry covers everything below
///   that path; a glob entry covers paths below its literal prefix that
///   match the glob.
/// - `ignore = [".*", "~*"]`: matched against every component name below
///   the monitor root, so an ignored directory hides its whole subtree while
///   a monitored root that itself sits under a hidden directory still works.
#[derive(Clone)]
pub struct ChangeFilter {
    base: PathBuf,
    monitors: Vec<MonitorEntry>,
    ignore: GlobSet,
}

impl fmt::Debug for ChangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let monitors: Vec<&str> = self.monitors.iter().map(|m| m.pattern.as_str()).collect();
        f.debug_struct("ChangeFilter")
            .field("base", &self.base)
            .field("monitors", &monitors)
            .finish_non_exhaustive()
    }
}

impl ChangeFilter {
    pub fn new(base: impl Into<PathBuf>, monitor: &[String], ignore: &[String]) -> Result<Self> {
        let base = base.into();

        if monitor.is_empty() {
            return Err(WatchrunError::ConfigError(
                "at least one monitor pattern is required".to_string(),
            ));
        }

        let monitors = monitor
            .iter()
            .map(|pat| MonitorEntry::compile(&base, pat))
            .collect::<Result<Vec<_>>>()?;

        let mut builder = GlobSetBuilder::new();
        for pat in ignore {
            builder.add(Glob::new(pat)?);
        }

        Ok(Self {
            base,
            monitors,
            ignore: builder.build()?,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Paths to register with the OS watcher, in pattern order, without
    /// duplicates.
    pub fn watch_roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = Vec::with_capacity(self.monitors.len());
        for entry in &self.monitors {
            if !roots.contains(&entry.root) {
                roots.push(entry.root.clone());
            }
        }
        roots
    }

    /// Whether a change at `path` (absolute, as reported by the watcher)
    /// should trigger a restart.
    pub fn is_relevant(&self, path: &Path) -> bool {
        let rel = relative_str(&self.base, path).unwrap_or_else(|| to_slash(path));

        self.monitors
            .iter()
            .any(|m| m.covers(path, &rel) && !self.is_ignored(m.below_root(path)))
    }

    fn is_ignored(&self, below_root: &Path) -> bool {
        below_root.components().any(|c| match c {
            Component::Normal(name) => self.ignore.is_match(Path::new(name)),
            _ => false,
        })
    }
}
