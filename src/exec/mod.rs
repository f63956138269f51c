// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`process`] holds `ProcessSpec`, one step of a pipeline, and builds the
//!   `tokio::process::Command` for it.
//! - [`steps`] splits the trailing command-line arguments into steps.
//! - [`pipeline`] runs a chain of steps sequentially and supports
//!   cancellation from another task.
//! - [`notice`] renders the `<< ... >>` status lines and defines where they
//!   go.

pub mod notice;
pub mod pipeline;
pub mod process;
pub mod steps;

pub use notice::{Notice, NoticeSink, StdoutNotices};
pub use pipeline::{Pipeline, PipelineHandle, PipelineOutcome};
pub use process::{OutputMode, ProcessSpec};
pub use steps::{parse_steps, validate_steps, STEP_DELIMITER};
