// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod watch;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_optional, WatchConfig};
use crate::engine::{ChangeBatch, LoopEvent, ReactionLoop};
use crate::errors::Result;
use crate::exec::{parse_steps, validate_steps, NoticeSink, OutputMode, ProcessSpec, StdoutNotices};

const SOURCE_STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - step parsing and config resolution
/// - the change source (file watcher + debouncer)
/// - the reaction loop that restarts the pipeline
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let steps = parse_steps(&args.steps);
    if steps.is_empty() {
        cli::print_help()?;
        return Ok(());
    }
    validate_steps(&steps)?;

    let cwd = std::env::current_dir().context("resolving current directory")?;
    let file = load_optional(args.config.as_deref(), &cwd)?;
    let config = WatchConfig::resolve(file.as_ref(), &args)?;

    if config.verbose || args.dry_run {
        print_summary(&config, &steps);
    }
    if args.dry_run {
        debug!("dry-run complete (no execution)");
        return Ok(());
    }

    let (tx, rx) = mpsc::channel::<LoopEvent>(16);

    // Run once at startup, before any filesystem event arrives.
    tx.send(LoopEvent::Changed(ChangeBatch::initial()))
        .await
        .context("queueing the initial run")?;

    let source = watch::spawn_change_source(&config, &cwd, tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(LoopEvent::ShutdownRequested).await;
        });
    }
    drop(tx);

    let notices: Arc<dyn NoticeSink> = Arc::new(StdoutNotices);
    let reaction = ReactionLoop::new(steps, OutputMode::Merged, notices);

    if let Some(last) = reaction.run(rx).await {
        let outcome = last.wait().await?;
        info!(?outcome, "last pipeline finished");
    }

    if timeout(SOURCE_STOP_TIMEOUT, source.stop()).await.is_err() {
        debug!("change source did not stop in time");
    }

    info!("watchrun exiting");
    Ok(())
}

/// Print the resolved options and the parsed steps.
pub fn print_summary(config: &WatchConfig, steps: &[ProcessSpec]) {
    println!("Options:");
    println!("    interval   : {:?}", config.interval);
    println!("    recursive  : {}", config.recurse);
    println!("    monitoring : {:?}", config.monitor);
    println!("    ignoring   : {:?}", config.ignore);
    println!();

    println!("Processes:");
    for step in steps {
        println!("    {step}");
    }
    println!();
}
