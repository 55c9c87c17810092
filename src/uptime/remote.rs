//! Remote command execution
//!
//! The uptime lookup runs a command on the control-plane host. The
//! transport sits behind [`RemoteExecutor`] so tests (and alternative
//! transports) can replace ssh.

use crate::config::HostKeyChecking;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Who to run the command as, and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub username: String,
    pub host: String,
}

impl std::fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.username, self.host)
    }
}

/// Captured result of a finished remote command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs a command on a remote host and captures its output
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn execute(
        &self,
        target: &RemoteTarget,
        command: &[String],
    ) -> Result<CommandOutput, RemoteError>;
}

/// [`RemoteExecutor`] backed by the OpenSSH client
#[derive(Debug, Clone)]
pub struct SshExecutor {
    program: PathBuf,
    host_key_checking: HostKeyChecking,
}

impl SshExecutor {
    pub fn new(program: PathBuf, host_key_checking: HostKeyChecking) -> Self {
        Self {
            program,
            host_key_checking,
        }
    }

    /// Full argument list passed to the ssh program
    pub fn args(&self, target: &RemoteTarget, command: &[String]) -> Vec<String> {
        let mut args = Vec::with_capacity(command.len() + 5);
        match self.host_key_checking {
            HostKeyChecking::Strict => {
                args.extend(["-o".to_string(), "StrictHostKeyChecking=yes".to_string()]);
            }
            // Any host key is accepted and nothing is recorded.
            HostKeyChecking::Disabled => {
                args.extend([
                    "-o".to_string(),
                    "UserKnownHostsFile=/dev/null".to_string(),
                    "-o".to_string(),
                    "StrictHostKeyChecking=no".to_string(),
                ]);
            }
        }
        args.push(target.to_string());
        args.extend(command.iter().cloned());
        args
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn execute(
        &self,
        target: &RemoteTarget,
        command: &[String],
    ) -> Result<CommandOutput, RemoteError> {
        let args = self.args(target, command);
        tracing::debug!(
            program = %self.program.display(),
            args = ?args,
            "Running remote command"
        );

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| RemoteError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
