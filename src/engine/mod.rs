// src/engine/mod.rs

//! Reaction engine for watchrun.
//!
//! The change source, the Ctrl-C handler and tests all feed [`LoopEvent`]s
//! into one channel. The [`ReactionLoop`] drains it and turns every change
//! notification into "kill the previous pipeline, start a new one".

use std::path::PathBuf;

pub mod reaction;

pub use reaction::ReactionLoop;

/// One debounced "something changed" notification.
///
/// The paths are informational (logged at debug level); the reaction loop
/// only cares that a batch arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    pub paths: Vec<PathBuf>,
}

impl ChangeBatch {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// The batch delivered once at startup, before any filesystem event.
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn is_initial(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Events flowing into the reaction loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    /// Watched files changed; restart the pipeline.
    Changed(ChangeBatch),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}
