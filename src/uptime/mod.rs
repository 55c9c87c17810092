//! Control-plane uptime lookup
//!
//! Resolves the control-plane host from the kubeconfig's current context
//! and runs an uptime command on it. The lookup is best-effort: every
//! failure becomes an [`UptimeError`] that is rendered into the report.

pub mod kubeconfig;
pub mod remote;
pub mod side_fetch;

pub use kubeconfig::{Kubeconfig, host_from_server};
pub use remote::{CommandOutput, RemoteError, RemoteExecutor, RemoteTarget, SshExecutor};
pub use side_fetch::{SideFetch, SideFetchOutcome};

use crate::config::UptimeConfig;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UptimeError {
    #[error("unable to read kubeconfig {path}: {source}")]
    KubeconfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse kubeconfig: {0}")]
    KubeconfigParse(#[source] serde_yaml::Error),

    #[error("invalid kubeconfig: empty current-context field")]
    EmptyCurrentContext,

    #[error("invalid kubeconfig: no contexts found")]
    NoContexts,

    #[error("invalid kubeconfig: no clusters found")]
    NoClusters,

    #[error(
        "invalid kubeconfig: unable to find current context ({0}) in provided list of contexts"
    )]
    ContextNotFound(String),

    #[error(
        "invalid kubeconfig: unable to find current cluster ({0}) in provided list of clusters"
    )]
    ClusterNotFound(String),

    #[error("malformed cluster server address: expecting scheme://host:port, but got {0}")]
    MalformedServer(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("remote command on {target} failed ({status}): {stderr}")]
    CommandFailed {
        target: String,
        status: String,
        stderr: String,
    },

    #[error("remote command on {target} wrote only to stderr: {stderr}")]
    CommandStderr { target: String, stderr: String },

    #[error("no output from command: {command}")]
    NoOutput { command: String },
}

/// Looks up the control-plane uptime for one request
pub struct UptimeFetcher {
    kubeconfig: PathBuf,
    username: String,
    command: Vec<String>,
    executor: Arc<dyn RemoteExecutor>,
}

impl UptimeFetcher {
    pub fn new(
        kubeconfig: PathBuf,
        config: &UptimeConfig,
        executor: Arc<dyn RemoteExecutor>,
    ) -> Self {
        Self {
            kubeconfig,
            username: config.username.clone(),
            command: config.command.clone(),
            executor,
        }
    }

    /// Run the full lookup: kubeconfig → host → remote command
    pub async fn fetch(&self) -> Result<String, UptimeError> {
        let kubeconfig = Kubeconfig::from_file(&self.kubeconfig).await?;
        let server = kubeconfig.server()?;
        let target = RemoteTarget {
            username: self.username.clone(),
            host: host_from_server(server)?,
        };

        tracing::debug!(remote = %target, server = %server, "Fetching control-plane uptime");

        let output = self.executor.execute(&target, &self.command).await?;
        interpret_output(&target, &self.command, output)
    }
}

/// Turn captured command output into the uptime text or an error
fn interpret_output(
    target: &RemoteTarget,
    command: &[String],
    output: CommandOutput,
) -> Result<String, UptimeError> {
    let stdout = output.stdout.trim_end();
    let stderr = output.stderr.trim_end();

    if !output.success {
        let status = match output.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        return Err(UptimeError::CommandFailed {
            target: target.to_string(),
            status,
            stderr: stderr.to_string(),
        });
    }
    if !stdout.is_empty() {
        return Ok(stdout.to_string());
    }
    if !stderr.is_empty() {
        return Err(UptimeError::CommandStderr {
            target: target.to_string(),
            stderr: stderr.to_string(),
        });
    }
    Err(UptimeError::NoOutput {
        command: command.join(" "),
    })
}
