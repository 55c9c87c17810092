//! Configuration management for Quant
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Every section has defaults, so the service can run without a config file
//! as long as a kubeconfig path is supplied on the command line or through
//! the `KUBECONFIG` environment variable.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Upper bound for `scrape.timeout_seconds`
pub const MAX_SCRAPE_TIMEOUT_SECONDS: u64 = 300;
/// Upper bound for `uptime.wait_ms`
pub const MAX_UPTIME_WAIT_MS: u64 = 60_000;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub uptime: UptimeConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Metrics source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapeConfig {
    /// Full URL of the Prometheus text endpoint
    #[serde(default = "default_scrape_url")]
    pub url: String,
    /// Deadline for the whole scrape (connect + body)
    #[serde(default = "default_scrape_timeout")]
    pub timeout_seconds: u64,
    /// Metric family whose samples are aggregated
    #[serde(default = "default_metric_family")]
    pub metric_family: String,
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: default_scrape_url(),
            timeout_seconds: default_scrape_timeout(),
            metric_family: default_metric_family(),
        }
    }
}

fn default_scrape_url() -> String {
    "http://localhost:8080/metrics".to_string()
}

fn default_scrape_timeout() -> u64 {
    10
}

fn default_metric_family() -> String {
    "apiserver_request_count".to_string()
}

/// Host key verification policy for the remote uptime command
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HostKeyChecking {
    /// Verify against the user's known hosts file
    Strict,
    /// Accept any host key and never record it
    #[default]
    Disabled,
}

/// Uptime lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UptimeConfig {
    /// Path to the kubeconfig naming the control-plane server
    #[serde(default)]
    kubeconfig: Option<PathBuf>,
    /// How long a request waits for the uptime lookup before giving up
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_command")]
    pub command: Vec<String>,
    #[serde(default = "default_ssh_program")]
    pub ssh_program: PathBuf,
    #[serde(default)]
    pub host_key_checking: HostKeyChecking,
}

impl UptimeConfig {
    /// Get the kubeconfig path, if one was configured
    pub fn kubeconfig(&self) -> Option<&Path> {
        self.kubeconfig.as_deref()
    }

    /// Replace the kubeconfig path (command-line and environment take precedence)
    pub fn set_kubeconfig(&mut self, path: PathBuf) {
        self.kubeconfig = Some(path);
    }

    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

impl Default for UptimeConfig {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            wait_ms: default_wait_ms(),
            username: default_username(),
            command: default_command(),
            ssh_program: default_ssh_program(),
            host_key_checking: HostKeyChecking::default(),
        }
    }
}

fn default_wait_ms() -> u64 {
    500
}

fn default_username() -> String {
    "core".to_string()
}

fn default_command() -> Vec<String> {
    vec!["uptime".to_string(), "--pretty".to_string()]
}

fn default_ssh_program() -> PathBuf {
    PathBuf::from("/usr/bin/ssh")
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from an optional TOML file
    ///
    /// Without a path the built-in defaults are used. A kubeconfig override
    /// (from `--kubeconfig` or `KUBECONFIG`) replaces whatever the file says.
    pub fn load(path: Option<&Path>, kubeconfig: Option<PathBuf>) -> AppResult<Self> {
        let (mut config, path_display) = match path {
            Some(path) => {
                let path_display = path.display().to_string();
                let content = std::fs::read_to_string(path).map_err(|source| {
                    AppError::ConfigFileRead {
                        path: path_display.clone(),
                        source,
                    }
                })?;
                let config: Self =
                    toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
                        path: path_display.clone(),
                        source,
                    })?;
                (config, path_display)
            }
            None => (Self::default(), "<defaults>".to_string()),
        };

        if let Some(kubeconfig) = kubeconfig {
            config.uptime.set_kubeconfig(kubeconfig);
        }

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        Self::load(Some(path.as_ref()), None)
    }

    /// Validate configuration values
    ///
    /// The kubeconfig path is not checked here; its absence is reported when
    /// the application state is built so that `quant config` works without one.
    pub fn validate(&self) -> AppResult<()> {
        if self.scrape.timeout_seconds == 0 {
            return Err(AppError::Config(
                "scrape.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.scrape.timeout_seconds > MAX_SCRAPE_TIMEOUT_SECONDS {
            return Err(AppError::Config(format!(
                "scrape.timeout_seconds cannot exceed {} seconds, got {}",
                MAX_SCRAPE_TIMEOUT_SECONDS, self.scrape.timeout_seconds
            )));
        }

        let url = reqwest::Url::parse(&self.scrape.url).map_err(|e| {
            AppError::Config(format!(
                "scrape.url '{}' is not a valid URL: {}",
                self.scrape.url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "scrape.url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if !is_metric_name(&self.scrape.metric_family) {
            return Err(AppError::Config(format!(
                "scrape.metric_family '{}' is not a valid metric name",
                self.scrape.metric_family
            )));
        }

        if self.uptime.wait_ms == 0 || self.uptime.wait_ms > MAX_UPTIME_WAIT_MS {
            return Err(AppError::Config(format!(
                "uptime.wait_ms must be in (0, {}], got {}",
                MAX_UPTIME_WAIT_MS, self.uptime.wait_ms
            )));
        }
        if self.uptime.username.trim().is_empty() {
            return Err(AppError::Config(
                "uptime.username cannot be empty".to_string(),
            ));
        }
        if self.uptime.command.is_empty() {
            return Err(AppError::Config(
                "uptime.command must contain at least one word".to_string(),
            ));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    /// Parse and validate configuration from a TOML string
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s).map_err(|source| AppError::ConfigParseFailed {
            path: "<string>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Prometheus metric names match `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
