// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling `monitor` / `ignore` glob patterns.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Debouncing bursts of events into single change notifications.
//!
//! It does **not** know about pipelines; it only produces `LoopEvent`s.

pub mod debounce;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use debounce::debounce;
pub use patterns::ChangeFilter;
pub use watcher::{spawn_change_source, ChangeSourceHandle};
