//! HTTP request handlers for Quant

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::scrape::MetricsSource;
use crate::uptime::{RemoteExecutor, SshExecutor, UptimeFetcher};
use std::sync::Arc;

pub mod report;

/// Application state shared across all handlers
///
/// Built once at startup from the loaded configuration. All fields are
/// Arc'd for cheap cloning across Axum handlers; nothing in here is
/// mutated after construction.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    source: Arc<MetricsSource>,
    uptime: Arc<UptimeFetcher>,
}

impl AppState {
    /// Create state that runs the uptime command over ssh
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let executor = Arc::new(SshExecutor::new(
            config.uptime.ssh_program.clone(),
            config.uptime.host_key_checking,
        ));
        Self::with_executor(config, executor)
    }

    /// Create state with a custom remote executor
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if no kubeconfig path is configured.
    pub fn with_executor(
        config: Arc<Config>,
        executor: Arc<dyn RemoteExecutor>,
    ) -> AppResult<Self> {
        let kubeconfig = config.uptime.kubeconfig().ok_or_else(|| {
            AppError::Config(
                "A --kubeconfig location must be specified (or set KUBECONFIG)".to_string(),
            )
        })?;

        let uptime = UptimeFetcher::new(kubeconfig.to_path_buf(), &config.uptime, executor);
        let source = MetricsSource::new(&config.scrape)?;

        Ok(Self {
            config,
            source: Arc::new(source),
            uptime: Arc::new(uptime),
        })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the metrics source
    pub fn source(&self) -> &MetricsSource {
        &self.source
    }

    /// Get a shared handle to the uptime fetcher
    pub fn uptime(&self) -> Arc<UptimeFetcher> {
        self.uptime.clone()
    }
}
