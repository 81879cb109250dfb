use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::types::{CommandOutcome, ExecutionError, Result};

/// Maximum size for captured stdout/stderr to prevent memory issues
const MAX_OUTPUT_SIZE: usize = 10 * 1024; // 10KB per stream

/// Shell used to interpret commands (templates rely on `cd X && Y` chaining)
const SHELL: &str = "sh";

/// Runs a resolved command line through the shell and waits for it
///
/// Completion is awaited before returning; there is no fire-and-forget path.
/// A non-zero exit code lands in the returned `CommandOutcome`, while a spawn
/// failure or a timeout is the only way `run` errors.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    timeout: Duration,
    cwd: Option<PathBuf>,
}

impl ShellExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, cwd: None }
    }

    /// Run commands from `cwd` instead of the current working directory
    pub fn with_cwd<P: AsRef<Path>>(mut self, cwd: P) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    pub async fn run(&self, command: &str) -> Result<CommandOutcome> {
        debug!(
            command = %command,
            cwd = ?self.cwd,
            timeout_secs = self.timeout.as_secs(),
            "Executing command"
        );

        let mut cmd = Command::new(SHELL);
        cmd.arg("-c")
            .arg(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null()); // Ensure no stdin interaction
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let start = Instant::now();

        match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => {
                let exit_code = output.status.code();
                let stdout = truncate_output(output.stdout);
                let stderr = truncate_output(output.stderr);
                let duration_ms = start.elapsed().as_millis() as u64;

                if exit_code == Some(0) {
                    debug!(
                        command = %command,
                        duration_ms = duration_ms,
                        "Command completed"
                    );
                } else {
                    warn!(
                        command = %command,
                        exit_code = ?exit_code,
                        stderr = %stderr,
                        "Command finished with non-zero exit code"
                    );
                }

                Ok(CommandOutcome {
                    command: command.to_string(),
                    exit_code,
                    stdout,
                    stderr,
                    duration_ms,
                })
            }
            Ok(Err(io_error)) => {
                error!(
                    command = %command,
                    error = %io_error,
                    "Failed to launch command"
                );
                Err(ExecutionError::LaunchFailed {
                    command: command.to_string(),
                    source: io_error,
                }
                .into())
            }
            Err(_elapsed) => {
                warn!(
                    command = %command,
                    timeout_secs = self.timeout.as_secs(),
                    "Command timed out"
                );
                Err(ExecutionError::Timeout {
                    command: command.to_string(),
                    timeout: self.timeout.as_secs(),
                }
                .into())
            }
        }
    }
}

/// Truncate command output to prevent memory issues
fn truncate_output(output: Vec<u8>) -> String {
    let output_str = String::from_utf8_lossy(&output);
    if output_str.len() > MAX_OUTPUT_SIZE {
        let truncated = &output_str[..MAX_OUTPUT_SIZE];
        format!("{}... [truncated at {} bytes]", truncated, MAX_OUTPUT_SIZE)
    } else {
        output_str.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn executor() -> ShellExecutor {
        ShellExecutor::new(Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_successful_command() {
        let outcome = executor().run("echo hello world").await.unwrap();

        assert_eq!(outcome.exit_code, Some(0));
        assert!(outcome.success());
        assert_eq!(outcome.stdout.trim(), "hello world");
        assert!(outcome.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_data_not_error() {
        let outcome = executor().run("exit 3").await.unwrap();

        assert_eq!(outcome.exit_code, Some(3));
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn test_shell_chaining_works() {
        let dir = tempdir().unwrap();
        let outcome = executor()
            .with_cwd(dir.path())
            .run("mkdir demo && cd demo && pwd")
            .await
            .unwrap();

        assert!(outcome.success());
        assert!(outcome.stdout.trim().ends_with("demo"));
    }

    #[tokio::test]
    async fn test_working_directory() {
        let dir = tempdir().unwrap();
        let outcome = executor().with_cwd(dir.path()).run("pwd").await.unwrap();

        assert_eq!(outcome.stdout.trim(), dir.path().to_string_lossy());
    }

    #[tokio::test]
    async fn test_stderr_captured() {
        let outcome = executor().run("echo oops >&2; exit 1").await.unwrap();

        assert_eq!(outcome.exit_code, Some(1));
        assert_eq!(outcome.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_timeout() {
        let executor = ShellExecutor::new(Duration::from_millis(100));
        let result = executor.run("sleep 5").await;

        match result {
            Err(crate::types::Error::Execution(ExecutionError::Timeout { command, .. })) => {
                assert!(command.contains("sleep"));
            }
            other => panic!("Expected Timeout, got: {:?}", other),
        }
    }

    #[test]
    fn test_truncate_output() {
        let small = b"hello world".to_vec();
        assert_eq!(truncate_output(small), "hello world");

        let large = "x".repeat(MAX_OUTPUT_SIZE + 100).into_bytes();
        let result = truncate_output(large);
        assert!(result.contains("truncated"));
    }
}
