use std::sync::{Arc, Mutex};
use std::time::Duration;

use watchrun::exec::{Notice, NoticeSink};

/// A notice sink that remembers everything it was given.
///
/// Clones share the same log, so keep one clone in the test and hand the
/// other to the code under test as `Arc<dyn NoticeSink>`.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotices {
    seen: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(&self) -> Arc<dyn NoticeSink> {
        Arc::new(self.clone())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.seen.lock().unwrap().clone()
    }

    /// Rendered notices, minus restart timestamps (those vary per run).
    pub fn lines(&self) -> Vec<String> {
        self.notices()
            .iter()
            .filter(|n| !matches!(n, Notice::Restart(_)))
            .map(ToString::to_string)
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Notice) -> bool) -> usize {
        self.seen.lock().unwrap().iter().filter(|n| pred(n)).count()
    }

    /// Poll until at least `n` notices match `pred`. Panics after 5 seconds.
    pub async fn wait_for(&self, n: usize, pred: impl Fn(&Notice) -> bool) {
        for _ in 0..500 {
            if self.count(&pred) >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {n} matching notices, got {:?}",
            self.notices()
        );
    }
}

impl NoticeSink for RecordingNotices {
    fn notice(&self, notice: Notice) {
        self.seen.lock().unwrap().push(notice);
    }
}
