use std::process::Stdio;

use thiserror::Error;
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::debug;

/// The scan binary could not be started. Surfaced as an immediate HTTP
/// failure; by the time this can occur no body bytes have been sent.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn {binary:?}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{binary:?} spawned without a {pipe} pipe")]
    MissingPipe { binary: String, pipe: &'static str },
}

/// A running scan process and its two output pipes.
///
/// Owned exclusively by the request that spawned it. The child is reaped
/// exactly once by the multiplexer; `kill_on_drop` backstops the paths where
/// the owner is dropped early so a scan never outlives its request.
#[derive(Debug)]
pub struct ScanProcess {
    pub child: Child,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Spawn the scan binary with an already-validated argument vector.
///
/// No shell is involved: `args` land in the child's argv untouched. Both
/// output descriptors are real OS pipes; stdin is closed since the tool is
/// never driven interactively.
pub fn launch(binary: &str, args: &[String]) -> Result<ScanProcess, LaunchError> {
    debug!(binary, ?args, "spawning scan process");

    let mut child = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            binary: binary.to_string(),
            source,
        })?;

    let stdout = child.stdout.take().ok_or(LaunchError::MissingPipe {
        binary: binary.to_string(),
        pipe: "stdout",
    })?;
    let stderr = child.stderr.take().ok_or(LaunchError::MissingPipe {
        binary: binary.to_string(),
        pipe: "stderr",
    })?;

    Ok(ScanProcess {
        child,
        stdout,
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_launch_error() {
        let err = launch("definitely-not-a-real-binary-7f3a", &[]).unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
    }

    #[tokio::test]
    async fn launch_yields_both_pipes_and_exit_status() {
        let mut proc = launch("true", &[]).expect("spawn true");
        let status = proc.child.wait().await.expect("wait");
        assert!(status.success());
    }
}
