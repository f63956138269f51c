// src/exec/notice.rs

//! User-facing status lines.
//!
//! Notices go to stdout next to the child output, wrapped in `<< >>` so the
//! two are easy to tell apart. Diagnostics go through `tracing` instead.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::exec::ProcessSpec;

/// A status line emitted by a pipeline or the reaction loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A step is about to be started.
    Running(ProcessSpec),
    /// A step exited successfully.
    Done {
        spec: ProcessSpec,
        elapsed: Duration,
    },
    /// The active step of a cancelled pipeline is being terminated.
    Killed(ProcessSpec),
    /// A step could not be started.
    Failed {
        spec: ProcessSpec,
        error: String,
    },
    /// A change was observed and a fresh pipeline is being started.
    Restart(DateTime<Local>),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Running(spec) => write!(f, "<< running: {spec} >>"),
            Notice::Done { spec, elapsed } => write!(f, "<< done: {spec} {elapsed:?} >>"),
            Notice::Killed(spec) => write!(f, "<< kill: {spec} >>"),
            Notice::Failed { spec, error } => write!(f, "<< fail: {spec}: {error} >>"),
            Notice::Restart(at) => write!(f, "<< {} >>", at.format("%Y-%m-%d %H:%M:%S%.3f")),
        }
    }
}

/// Destination for [`Notice`]s.
///
/// Pipelines call this while holding their state lock, so implementations
/// must not call back into a pipeline.
pub trait NoticeSink: Send + Sync {
    fn notice(&self, notice: Notice);
}

/// Production sink: one line per notice on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNotices;

impl NoticeSink for StdoutNotices {
    fn notice(&self, notice: Notice) {
        let mut out = std::io::stdout().lock();
        // A closed stdout is not worth stopping the pipeline over.
        let _ = writeln!(out, "{notice}");
        let _ = out.flush();
    }
}
