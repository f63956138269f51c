// src/engine/reaction.rs

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::exec::{Notice, NoticeSink, OutputMode, Pipeline, PipelineHandle, ProcessSpec};

use super::{ChangeBatch, LoopEvent};

/// Turns change notifications into kill/restart decisions.
///
/// Holds the fixed step list and the most recently started pipeline. On
/// every change the previous pipeline is killed first, then a fresh one is
/// spawned and left to run on its own task. The loop does not wait for the
/// killed pipeline's process to exit, so its last output may briefly
/// interleave with the new pipeline's first step.
pub struct ReactionLoop {
    steps: Arc<[ProcessSpec]>,
    output: OutputMode,
    notices: Arc<dyn NoticeSink>,
    current: Option<PipelineHandle>,
    restarts: u64,
}

impl fmt::Debug for ReactionLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactionLoop")
            .field("steps", &self.steps.len())
            .field("output", &self.output)
            .field("current", &self.current.as_ref().map(PipelineHandle::id))
            .field("restarts", &self.restarts)
            .finish_non_exhaustive()
    }
}

impl ReactionLoop {
    pub fn new(
        steps: impl Into<Arc<[ProcessSpec]>>,
        output: OutputMode,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        Self {
            steps: steps.into(),
            output,
            notices,
            current: None,
            restarts: 0,
        }
    }

    /// Number of pipelines started so far.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Main event loop.
    ///
    /// Returns when the event channel closes or shutdown is requested,
    /// handing back the last pipeline started (if any) so the caller can
    /// wait for it. On shutdown that pipeline has already been killed.
    pub async fn run(mut self, mut events: mpsc::Receiver<LoopEvent>) -> Option<PipelineHandle> {
        info!(steps = self.steps.len(), "reaction loop started");

        while let Some(event) = events.recv().await {
            match event {
                LoopEvent::Changed(batch) => self.react(batch),
                LoopEvent::ShutdownRequested => {
                    info!("shutdown requested; killing active pipeline");
                    if let Some(pipeline) = self.current.as_ref() {
                        pipeline.kill();
                    }
                    return self.current.take();
                }
            }
        }

        info!("change stream closed; reaction loop exiting");
        self.current.take()
    }

    /// Handle one change notification: kill the previous pipeline, then
    /// spawn a new one.
    pub fn react(&mut self, batch: ChangeBatch) {
        debug!(paths = ?batch.paths, initial = batch.is_initial(), "change notification");

        if let Some(previous) = self.current.take() {
            debug!(pipeline = previous.id(), "killing previous pipeline");
            previous.kill();
        }

        self.notices.notice(Notice::Restart(Local::now()));

        let handle = Pipeline::spawn(Arc::clone(&self.steps), self.output, Arc::clone(&self.notices));
        self.restarts += 1;
        debug!(pipeline = handle.id(), restarts = self.restarts, "pipeline spawned");
        self.current = Some(handle);
    }
}
