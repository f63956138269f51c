// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Everything after the flags is the pipeline itself, split into steps on
//! `;;` (quote it in the shell):
//!
//! ```text
//! watchrun --monitor 'src;Cargo.toml' cargo build ';;' cargo test
//! ```

use clap::{ArgAction, Parser, ValueEnum};

/// Command-line arguments for `watchrun`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "watchrun",
    version,
    about = "Re-run a chain of commands whenever watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a TOML config file with a `[watch]` section.
    ///
    /// If omitted, `Watchrun.toml` in the current directory is used when it
    /// exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Interval to wait between monitoring, e.g. `300ms`, `2s`.
    #[arg(long, value_name = "DURATION")]
    pub interval: Option<String>,

    /// Files/folders/globs to monitor, separated by `;` or `:`.
    #[arg(long, value_name = "GLOBS")]
    pub monitor: Option<String>,

    /// Ignore files/folders that match these globs, separated by `;` or `:`.
    #[arg(long, value_name = "GLOBS")]
    pub ignore: Option<String>,

    /// When watching a folder, recurse into subfolders.
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub recurse: Option<bool>,

    /// Print the resolved options and steps before starting.
    #[arg(long)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve options and parse steps, print them, but don't watch or run.
    #[arg(long)]
    pub dry_run: bool,

    /// The pipeline: `cmd args... ;; cmd args... ;; ...`
    #[arg(
        value_name = "STEPS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub steps: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Print the generated help text (used when no steps were given).
pub fn print_help() -> std::io::Result<()> {
    use clap::CommandFactory;

    CliArgs::command().print_help()
}
