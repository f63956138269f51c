#![allow(dead_code)]

pub use watchrun_test_utils::{cmd, init_tracing, sh, steps, with_timeout, RecordingNotices};

use watchrun::exec::Notice;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn is_running(n: &Notice) -> bool {
    matches!(n, Notice::Running(_))
}

pub fn is_killed(n: &Notice) -> bool {
    matches!(n, Notice::Killed(_))
}

pub fn is_failed(n: &Notice) -> bool {
    matches!(n, Notice::Failed { .. })
}

pub fn is_restart(n: &Notice) -> bool {
    matches!(n, Notice::Restart(_))
}

/// Indices of all notices matching `pred`, in emission order.
pub fn positions(notices: &[Notice], pred: impl Fn(&Notice) -> bool) -> Vec<usize> {
    notices
        .iter()
        .enumerate()
        .filter(|(_, n)| pred(n))
        .map(|(i, _)| i)
        .collect()
}
