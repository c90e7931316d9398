//! Running the invocations.

use std::path::Path;
use std::process::Command;

use codegen::{ProtocCommand, Toolchain};
use parameter::Parameters;

use crate::invocations::standard_invocations;
use crate::{PipelineError, Result};

/// Executes a command from a working directory.
pub trait CommandRunner {
    /// Run `command` in `cwd` and wait for it.
    fn run(&self, name: &str, command: &ProtocCommand, cwd: &Path) -> Result<()>;
}

/// Runs commands as child processes sharing this process's stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, name: &str, command: &ProtocCommand, cwd: &Path) -> Result<()> {
        tracing::debug!(%command, "running protoc");
        let status = Command::new(&command.program)
            .args(&command.args)
            .current_dir(cwd)
            .status()
            .map_err(|source| PipelineError::Spawn { program: command.program.clone(), source })?;
        if !status.success() {
            return Err(PipelineError::ProtocFailed { name: name.to_string(), status: status.to_string() });
        }
        Ok(())
    }
}

/// Run every standard invocation against `protos` from `root`.
///
/// Output directories are created first. Returns the directories whose
/// dispatch files still need `go generate`.
pub fn generate(
    root: &Path,
    layout: &Parameters,
    toolchain: &Toolchain,
    protos: &[String],
    runner: &dyn CommandRunner,
) -> Result<Vec<String>> {
    if protos.is_empty() {
        return Err(PipelineError::NoProtos);
    }

    let mut pending = Vec::new();
    for invocation in standard_invocations(layout) {
        let name = &invocation.parameters.name;
        let out = invocation.out_dir();
        tracing::info!("Generating {}...", name);
        std::fs::create_dir_all(root.join(out))
            .map_err(|source| PipelineError::CreateDir { dir: out.to_string(), source })?;

        runner.run(name, &invocation.command(toolchain, protos), root)?;

        if invocation.go_generate && !pending.iter().any(|dir| dir == out) {
            pending.push(out.to_string());
        }
    }
    Ok(pending)
}
