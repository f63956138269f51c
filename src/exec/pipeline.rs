// src/exec/pipeline.rs

//! One run of the step chain.
//!
//! A [`Pipeline`] runs its steps one after another in its own Tokio task and
//! can be cancelled from anywhere with [`Pipeline::kill`]. The only shared
//! state is the `(current step, active process, cancelled)` triple behind a
//! single mutex:
//!
//! - the lock is held while a step is checked, started and published, so a
//!   concurrent `kill` either sees the new process or prevents it from
//!   being started at all;
//! - the lock is never held across the wait for a child to exit, so `kill`
//!   never blocks behind a long-running step.
//!
//! The published "process handle" is the sending half of a oneshot channel.
//! The pipeline task owns the `Child`, selects on its exit and on that
//! channel, and issues the termination itself. `kill` returns as soon as
//! the request is published.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::process::Child;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{Result, WatchrunError};
use crate::exec::{Notice, NoticeSink, OutputMode, ProcessSpec};

static NEXT_PIPELINE_ID: AtomicU64 = AtomicU64::new(1);

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every step exited successfully.
    Completed,
    /// Step `step` (0-based) exited unsuccessfully; later steps never ran.
    /// `code` is `None` when the process was ended by a signal or could not
    /// be waited on.
    StepFailed { step: usize, code: Option<i32> },
    /// Step `step` could not be started. The pipeline marks itself
    /// cancelled.
    StartFailed { step: usize, error: String },
    /// `kill` was called before the pipeline finished.
    Cancelled,
}

/// The published handle of the running step.
struct ActiveProcess {
    kill: oneshot::Sender<()>,
    pid: Option<u32>,
}

#[derive(Default)]
struct PipelineState {
    current: Option<ProcessSpec>,
    active: Option<ActiveProcess>,
    cancelled: bool,
}

/// A step whose process has been started and published.
struct RunningStep {
    child: Child,
    kill_rx: oneshot::Receiver<()>,
    started: Instant,
}

enum StepStart {
    Started(RunningStep),
    Stopped(PipelineOutcome),
}

pub struct Pipeline {
    id: u64,
    steps: Arc<[ProcessSpec]>,
    output: OutputMode,
    notices: Arc<dyn NoticeSink>,
    state: Mutex<PipelineState>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("id", &self.id)
            .field("steps", &self.steps.len())
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a pipeline that has not started yet.
    ///
    /// Most callers want [`Pipeline::spawn`]. `run` must be driven at most
    /// once per instance; a new run always needs a new `Pipeline`.
    pub fn new(
        steps: Arc<[ProcessSpec]>,
        output: OutputMode,
        notices: Arc<dyn NoticeSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_PIPELINE_ID.fetch_add(1, Ordering::Relaxed),
            steps,
            output,
            notices,
            state: Mutex::new(PipelineState::default()),
        })
    }

    /// Create a pipeline and start running it on its own Tokio task.
    pub fn spawn(
        steps: Arc<[ProcessSpec]>,
        output: OutputMode,
        notices: Arc<dyn NoticeSink>,
    ) -> PipelineHandle {
        let pipeline = Self::new(steps, output, notices);
        let task = tokio::spawn(Arc::clone(&pipeline).run());
        PipelineHandle { pipeline, task }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn steps(&self) -> &[ProcessSpec] {
        &self.steps
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock_state().cancelled
    }

    /// The step most recently started by this pipeline, if any.
    pub fn current_step(&self) -> Option<ProcessSpec> {
        self.lock_state().current.clone()
    }

    /// Whether a step process is currently published as running.
    pub fn has_active_process(&self) -> bool {
        self.lock_state().active.is_some()
    }

    /// Run every step in order until one fails, one cannot be started, or
    /// the pipeline is killed.
    pub async fn run(self: Arc<Self>) -> PipelineOutcome {
        debug!(pipeline = self.id, steps = self.steps.len(), "pipeline started");
        let outcome = self.run_steps().await;
        info!(pipeline = self.id, ?outcome, "pipeline finished");
        outcome
    }

    async fn run_steps(&self) -> PipelineOutcome {
        for (step, spec) in self.steps.iter().enumerate() {
            let RunningStep {
                mut child,
                mut kill_rx,
                started,
            } = match self.start_step(step, spec) {
                StepStart::Started(running) => running,
                StepStart::Stopped(outcome) => return outcome,
            };

            let status = tokio::select! {
                status = child.wait() => status,
                _ = &mut kill_rx => {
                    self.terminate(&mut child, step).await;
                    return PipelineOutcome::Cancelled;
                }
            };

            self.lock_state().active = None;

            match status {
                Ok(status) if status.success() => {
                    self.notices.notice(Notice::Done {
                        spec: spec.clone(),
                        elapsed: started.elapsed(),
                    });
                }
                Ok(status) => {
                    info!(
                        pipeline = self.id,
                        step,
                        cmd = %spec,
                        exit_code = ?status.code(),
                        "step failed; stopping pipeline"
                    );
                    return PipelineOutcome::StepFailed {
                        step,
                        code: status.code(),
                    };
                }
                Err(err) => {
                    warn!(
                        pipeline = self.id,
                        step,
                        cmd = %spec,
                        error = %err,
                        "waiting for step process failed; stopping pipeline"
                    );
                    return PipelineOutcome::StepFailed { step, code: None };
                }
            }
        }

        PipelineOutcome::Completed
    }

    /// Check for cancellation, then start and publish the step process, all
    /// under the state lock.
    fn start_step(&self, step: usize, spec: &ProcessSpec) -> StepStart {
        let mut state = self.lock_state();
        if state.cancelled {
            debug!(pipeline = self.id, step, "pipeline cancelled; not starting step");
            return StepStart::Stopped(PipelineOutcome::Cancelled);
        }

        state.current = Some(spec.clone());
        let mut command = spec.command(self.output);
        self.notices.notice(Notice::Running(spec.clone()));

        let started = Instant::now();
        match command.spawn() {
            Ok(child) => {
                let (kill_tx, kill_rx) = oneshot::channel();
                let pid = child.id();
                state.active = Some(ActiveProcess { kill: kill_tx, pid });
                debug!(pipeline = self.id, step, ?pid, cmd = %spec, "step process started");
                StepStart::Started(RunningStep {
                    child,
                    kill_rx,
                    started,
                })
            }
            Err(err) => {
                state.active = None;
                state.cancelled = true;
                drop(state);

                let error = err.to_string();
                warn!(pipeline = self.id, step, cmd = %spec, %error, "failed to start step");
                self.notices.notice(Notice::Failed {
                    spec: spec.clone(),
                    error: error.clone(),
                });
                StepStart::Stopped(PipelineOutcome::StartFailed { step, error })
            }
        }
    }

    /// Terminate a step after `kill` and reap it.
    async fn terminate(&self, child: &mut Child, step: usize) {
        if let Err(err) = child.start_kill() {
            debug!(
                pipeline = self.id,
                step,
                error = %err,
                "step process already gone when terminating"
            );
        }

        match child.wait().await {
            Ok(status) => debug!(pipeline = self.id, step, %status, "killed step reaped"),
            Err(err) => debug!(pipeline = self.id, step, error = %err, "failed to reap killed step"),
        }
    }

    /// Stop this pipeline: terminate the active step, if any, and make sure
    /// no further step is started.
    ///
    /// Returns without waiting for the process to exit. Calling it again,
    /// or on a pipeline with nothing running, only re-sets the cancelled
    /// flag.
    pub fn kill(&self) {
        let mut state = self.lock_state();

        if let Some(active) = state.active.take() {
            if let Some(spec) = state.current.as_ref() {
                self.notices.notice(Notice::Killed(spec.clone()));
            }
            info!(pipeline = self.id, pid = ?active.pid, "terminating active step");
            if active.kill.send(()).is_err() {
                debug!(pipeline = self.id, "step exited before the kill request arrived");
            }
        }

        state.cancelled = true;
    }

    fn lock_state(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A spawned pipeline: the shared [`Pipeline`] plus the task running it.
///
/// Dropping the handle detaches the task; the pipeline keeps running until
/// it finishes or someone holding the `Arc<Pipeline>` kills it.
#[derive(Debug)]
pub struct PipelineHandle {
    pipeline: Arc<Pipeline>,
    task: JoinHandle<PipelineOutcome>,
}

impl PipelineHandle {
    pub fn id(&self) -> u64 {
        self.pipeline.id()
    }

    pub fn pipeline(&self) -> Arc<Pipeline> {
        Arc::clone(&self.pipeline)
    }

    pub fn kill(&self) {
        self.pipeline.kill();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the pipeline task to finish.
    pub async fn wait(self) -> Result<PipelineOutcome> {
        self.task.await.map_err(|err| WatchrunError::Other(err.into()))
    }
}
