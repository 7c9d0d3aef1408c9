use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{OrbitError, Result};

/// Runs external programs on behalf of a deployment cycle.
///
/// Both methods resolve once the child exits and report only whether it
/// succeeded. Neither enforces a timeout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `dir`.
    async fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()>;

    /// Run `script` through `bash -c` in `dir`.
    async fn run_shell(&self, dir: &Path, script: &str) -> Result<()> {
        self.run(dir, "bash", &["-c", script]).await
    }
}

/// Spawns real processes with `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
        let command_line = describe(program, args);
        // Output is discarded so a restart script that backgrounds its service
        // does not keep us waiting on inherited pipes.
        let status = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| OrbitError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            tracing::debug!(command = %command_line, code, "command_failed");
            return Err(OrbitError::Command {
                command: command_line,
                code,
            });
        }
        Ok(())
    }
}

fn describe(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    }
}
