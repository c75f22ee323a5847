use thiserror::Error;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

/// Exit status reported when a command hits its timeout, matching coreutils `timeout`.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl CommandOutput {
    pub fn succeeded(&self) -> bool {
        self.status == 0
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to execute command {cmd}: {source}")]
    Spawn { cmd: String, source: std::io::Error },
}

/// Run an external command with a hard timeout.
///
/// A non-zero exit is a normal result, never an error. On timeout the child
/// is killed and a synthetic exit 124 with an explanatory stderr is returned,
/// so calling loops decide what a late command means instead of hanging.
pub async fn run_cmd(
    cmd: &str,
    args: &[&str],
    timeout_secs: u64,
) -> Result<CommandOutput, CommandError> {
    let mut command = Command::new(cmd);
    command.args(args).kill_on_drop(true);

    match timeout(Duration::from_secs(timeout_secs), command.output()).await {
        Ok(result) => {
            let output = result.map_err(|source| CommandError::Spawn {
                cmd: cmd.to_string(),
                source,
            })?;
            Ok(CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                status: output.status.code().unwrap_or(-1),
            })
        }
        Err(_) => Ok(CommandOutput {
            stdout: String::new(),
            stderr: format!("command {} timed out after {}s", cmd, timeout_secs),
            status: TIMEOUT_EXIT_CODE,
        }),
    }
}

/// Run a privileged command through `sudo -n` so a password prompt fails fast
/// instead of hanging the calling loop.
pub async fn run_sudo(args: &[&str], timeout_secs: u64) -> Result<CommandOutput, CommandError> {
    let mut full_args = vec!["-n"];
    full_args.extend_from_slice(args);
    run_cmd("sudo", &full_args, timeout_secs).await
}

#[cfg(test)]
mod tests {
    use super::{TIMEOUT_EXIT_CODE, run_cmd};

    #[tokio::test]
    async fn captures_stdout_and_zero_status() {
        let output = run_cmd("echo", &["hello"], 5)
            .await
            .expect("echo should spawn");
        assert_eq!(output.status, 0);
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn nonzero_exit_is_a_normal_result() {
        let output = run_cmd("sh", &["-c", "exit 3"], 5)
            .await
            .expect("sh should spawn");
        assert_eq!(output.status, 3);
        assert!(!output.succeeded());
    }

    #[tokio::test]
    async fn timeout_yields_synthetic_exit() {
        let output = run_cmd("sleep", &["5"], 1)
            .await
            .expect("sleep should spawn");
        assert_eq!(output.status, TIMEOUT_EXIT_CODE);
        assert!(output.stderr.contains("timed out"));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let result = run_cmd("definitely-not-a-real-binary", &[], 5).await;
        assert!(result.is_err());
    }
}
