// tests/change_source.rs

mod common;
use crate::common::{init_tracing, TestResult};

use std::fs;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use watchrun::config::WatchConfig;
use watchrun::engine::LoopEvent;
use watchrun::errors::WatchrunError;
use watchrun::watch::spawn_change_source;

fn fast_config() -> WatchConfig {
    WatchConfig {
        interval: Duration::from_millis(50),
        ..WatchConfig::default()
    }
}

#[tokio::test]
async fn writing_a_watched_file_produces_a_change() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let (tx, mut rx) = mpsc::channel(8);
    let _source = spawn_change_source(&fast_config(), dir.path(), tx)?;

    sleep(Duration::from_millis(100)).await;
    fs::write(dir.path().join("main.rs"), "fn main() {}")?;

    match timeout(Duration::from_secs(5), rx.recv()).await? {
        Some(LoopEvent::Changed(batch)) => {
            assert!(
                batch.paths.iter().any(|p| p.ends_with("main.rs")),
                "unexpected batch {batch:?}"
            );
        }
        other => panic!("expected a change batch, got {other:?}"),
    }

    Ok(())
}

// Other backends may report the containing directory itself.
#[cfg(target_os = "linux")]
#[tokio::test]
async fn ignored_files_do_not_produce_changes() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let (tx, mut rx) = mpsc::channel(8);
    let _source = spawn_change_source(&fast_config(), dir.path(), tx)?;

    sleep(Duration::from_millis(100)).await;
    fs::write(dir.path().join(".hidden"), "x")?;
    fs::write(dir.path().join("scratch~"), "x")?;

    assert!(
        timeout(Duration::from_millis(500), rx.recv()).await.is_err(),
        "ignored files must not trigger"
    );

    Ok(())
}

#[tokio::test]
async fn missing_monitor_root_is_reported() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let config = WatchConfig {
        monitor: vec!["does-not-exist".to_string()],
        ..fast_config()
    };
    let (tx, _rx) = mpsc::channel(8);

    match spawn_change_source(&config, dir.path(), tx) {
        Err(WatchrunError::ConfigError(msg)) => assert!(msg.contains("does-not-exist")),
        other => panic!("expected ConfigError, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn stopping_the_source_closes_the_event_stream() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let (tx, mut rx) = mpsc::channel(8);
    let source = spawn_change_source(&fast_config(), dir.path(), tx)?;
    assert!(!source.is_finished());

    timeout(Duration::from_secs(5), source.stop()).await?;

    assert!(timeout(Duration::from_secs(1), rx.recv()).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn debouncer_exits_once_the_receiver_is_gone() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let (tx, rx) = mpsc::channel(8);
    let source = spawn_change_source(&fast_config(), dir.path(), tx)?;
    drop(rx);

    sleep(Duration::from_millis(100)).await;
    fs::write(dir.path().join("main.rs"), "fn main() {}")?;

    timeout(Duration::from_secs(5), async {
        while !source.is_finished() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await?;

    Ok(())
}
