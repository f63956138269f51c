// src/watch/watcher.rs

use std::path::PathBuf;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::engine::LoopEvent;
use crate::errors::{Result, WatchrunError};
use crate::watch::debounce::debounce;
use crate::watch::patterns::ChangeFilter;

/// Handle for the change source.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching; the debouncer then drains and exits on its own.
pub struct ChangeSourceHandle {
    _inner: RecommendedWatcher,
    debouncer: JoinHandle<()>,
}

impl std::fmt::Debug for ChangeSourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSourceHandle")
            .field("debouncer_finished", &self.debouncer.is_finished())
            .finish_non_exhaustive()
    }
}

impl ChangeSourceHandle {
    /// Whether the debouncer has exited (the reaction loop hung up or the
    /// watcher was stopped).
    pub fn is_finished(&self) -> bool {
        self.debouncer.is_finished()
    }

    /// Stop watching and wait for the debouncer to flush and exit.
    pub async fn stop(self) {
        let Self {
            _inner: watcher,
            debouncer,
        } = self;
        drop(watcher);

        if let Err(err) = debouncer.await {
            warn!(error = %err, "debouncer task failed");
        }
    }
}

/// Start watching according to `config` and deliver debounced
/// `LoopEvent::Changed` notifications on `events_tx`.
///
/// - `base` is the directory monitor/ignore patterns are relative to
///   (normally the current working directory).
/// - Each monitor root is registered recursively unless `config.recurse`
///   is false.
pub fn spawn_change_source(
    config: &WatchConfig,
    base: impl Into<PathBuf>,
    events_tx: mpsc::Sender<LoopEvent>,
) -> Result<ChangeSourceHandle> {
    let base = base.into();
    // Canonicalize once so we have a stable base path.
    let base = base.canonicalize().unwrap_or(base);

    let filter = ChangeFilter::new(&base, &config.monitor, &config.ignore)?;
    let roots = filter.watch_roots();

    // Channel from the blocking notify callback into the async world.
    let (raw_tx, raw_rx) = mpsc::unbounded_channel::<PathBuf>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Access(_)) {
                    return;
                }
                for path in event.paths {
                    if !filter.is_relevant(&path) {
                        continue;
                    }
                    if raw_tx.send(path).is_err() {
                        // Debouncer is gone; nothing left to notify.
                        return;
                    }
                }
            }
            Err(err) => warn!(error = %err, "file watch error"),
        },
        Config::default(),
    )?;

    let mode = if config.recurse {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };

    for root in &roots {
        watcher.watch(root, mode).map_err(|err| {
            WatchrunError::ConfigError(format!("cannot watch {}: {err}", root.display()))
        })?;
        debug!(root = %root.display(), ?mode, "watching");
    }

    info!(?roots, interval = ?config.interval, "change source started");

    let debouncer = tokio::spawn(debounce(raw_rx, config.interval, events_tx));

    Ok(ChangeSourceHandle {
        _inner: watcher,
        debouncer,
    })
}
