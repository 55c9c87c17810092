//! Command-line interface for Quant
//!
//! Provides argument parsing and subcommand handling for the Quant binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// API server request counts, ranked by client
#[derive(Parser)]
#[command(name = "quant")]
#[command(version)]
#[command(about = "API server request counts, ranked by client")]
#[command(
    long_about = "Quant scrapes a Prometheus metrics endpoint, ranks API server clients by \
    request count and serves the result as plain text, together with the control-plane \
    uptime fetched over ssh."
)]
pub struct Cli {
    /// Path to a TOML configuration file (built-in defaults are used otherwise)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Absolute path to the kubeconfig generated by the cluster installer
    #[arg(long, env = "KUBECONFIG", global = true)]
    pub kubeconfig: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Quant Configuration
# ====================
#
# Every setting below shows its default. Sections and keys may be omitted.

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 8000

# ─────────────────────────────────────────────────────────────────────────────
# METRICS SOURCE
# ─────────────────────────────────────────────────────────────────────────────

[scrape]
# Prometheus text endpoint scraped on every request
url = "http://localhost:8080/metrics"

# Deadline for one scrape in seconds (1-300)
timeout_seconds = 10

# Metric family aggregated per client
metric_family = "apiserver_request_count"

# ─────────────────────────────────────────────────────────────────────────────
# CONTROL-PLANE UPTIME
# ─────────────────────────────────────────────────────────────────────────────

[uptime]
# Path to the kubeconfig. --kubeconfig and $KUBECONFIG take precedence.
# kubeconfig = "/path/to/auth/kubeconfig"

# How long a request waits for the uptime lookup, in milliseconds
wait_ms = 500

# Remote user and command
username = "core"
command = ["uptime", "--pretty"]

# ssh client used to reach the control-plane host
ssh_program = "/usr/bin/ssh"

# Host key verification:
#   - "strict": verify against known_hosts
#   - "disabled": accept any host key (review before using outside test clusters)
host_key_checking = "disabled"

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"
"#
}
