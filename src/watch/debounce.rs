// src/watch/debounce.rs

//! Collapsing bursts of filesystem events into single notifications.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::{ChangeBatch, LoopEvent};

/// Forward relevant paths from `raw` to `out` as debounced batches.
///
/// The first path after a quiet period opens a window of `interval`; every
/// path that arrives before the window closes joins the same batch. Runs
/// until `raw` closes or the receiving side of `out` is dropped.
pub async fn debounce(
    mut raw: mpsc::UnboundedReceiver<PathBuf>,
    interval: Duration,
    out: mpsc::Sender<LoopEvent>,
) {
    while let Some(first) = raw.recv().await {
        let mut paths = vec![first];
        let mut raw_open = true;

        let window = tokio::time::sleep(interval);
        tokio::pin!(window);

        loop {
            tokio::select! {
                _ = &mut window => break,
                next = raw.recv() => match next {
                    Some(path) => paths.push(path),
                    None => {
                        raw_open = false;
                        break;
                    }
                },
            }
        }

        paths.sort();
        paths.dedup();
        debug!(count = paths.len(), "debounced change batch");

        if out
            .send(LoopEvent::Changed(ChangeBatch::new(paths)))
            .await
            .is_err()
        {
            debug!("reaction loop gone; stopping debouncer");
            return;
        }

        if !raw_open {
            break;
        }
    }

    debug!("raw change stream closed; debouncer finished");
}
