// src/exec/steps.rs

//! Turning the flat trailing argument list into pipeline steps.

use crate::errors::{Result, WatchrunError};
use crate::exec::ProcessSpec;

/// Token separating steps on the command line.
pub const STEP_DELIMITER: &str = ";;";

/// Split `tokens` into steps on [`STEP_DELIMITER`].
///
/// The first token of each group is the command, the rest are its args.
/// A leading or doubled delimiter produces a step with an empty command;
/// rejecting that is up to the caller (see [`validate_steps`]). A trailing
/// delimiter does not produce an extra step.
pub fn parse_steps<S: AsRef<str>>(tokens: &[S]) -> Vec<ProcessSpec> {
    let mut steps = Vec::new();
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        if token.as_ref() == STEP_DELIMITER {
            steps.push(segment(&tokens[start..i]));
            start = i + 1;
        }
    }

    if start < tokens.len() {
        steps.push(segment(&tokens[start..]));
    }

    steps
}

fn segment<S: AsRef<str>>(tokens: &[S]) -> ProcessSpec {
    match tokens.split_first() {
        Some((cmd, args)) => ProcessSpec::new(
            cmd.as_ref().to_string(),
            args.iter().map(|a| a.as_ref().to_string()),
        ),
        None => ProcessSpec::new("", Vec::<String>::new()),
    }
}

/// Reject steps that have nothing to run.
///
/// Step numbers in the error are 1-based, matching what the user typed.
pub fn validate_steps(steps: &[ProcessSpec]) -> Result<()> {
    match steps.iter().position(|s| s.cmd.trim().is_empty()) {
        Some(idx) => Err(WatchrunError::EmptyCommand { step: idx + 1 }),
        None => Ok(()),
    }
}
