// src/exec/process.rs

//! A single pipeline step: command name plus arguments.

use std::fmt;
use std::process::Stdio;

use tokio::process::Command;

/// Where a child process's stdout/stderr go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Child stdout inherits ours; child stderr is redirected into our stdout.
    #[default]
    Merged,
    /// Both streams go to the null device.
    Discard,
}

/// One step of a pipeline.
///
/// Built once by [`parse_steps`](crate::exec::parse_steps) and then only
/// read; pipelines share their steps behind an `Arc<[ProcessSpec]>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub cmd: String,
    pub args: Vec<String>,
}

impl ProcessSpec {
    pub fn new<C, I, A>(cmd: C, args: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            cmd: cmd.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the OS command for this step.
    ///
    /// The child is killed if its handle is dropped, so a pipeline task that
    /// goes away can never leave the process running.
    pub fn command(&self, output: OutputMode) -> Command {
        let mut cmd = Command::new(&self.cmd);
        cmd.args(&self.args).stdin(Stdio::null()).kill_on_drop(true);

        match output {
            OutputMode::Merged => {
                cmd.stdout(Stdio::inherit()).stderr(std::io::stdout());
            }
            OutputMode::Discard => {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }
        }

        cmd
    }
}

impl fmt::Display for ProcessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cmd)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
