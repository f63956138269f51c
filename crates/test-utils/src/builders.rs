use std::sync::Arc;

use watchrun::exec::ProcessSpec;

/// A step that runs `script` through `sh -c`.
pub fn sh(script: &str) -> ProcessSpec {
    ProcessSpec::new("sh", ["-c", script])
}

/// A step running `program` with `args` directly.
pub fn cmd(program: &str, args: &[&str]) -> ProcessSpec {
    ProcessSpec::new(program, args.iter().copied())
}

/// Bundle steps the way pipelines share them.
pub fn steps<I: IntoIterator<Item = ProcessSpec>>(specs: I) -> Arc<[ProcessSpec]> {
    specs.into_iter().collect()
}
