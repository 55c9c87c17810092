//! Quant HTTP server
//!
//! Serves the ranked API server request report on every path.

use axum::{Router, middleware, routing::get};
use clap::Parser;
use quant::{
    cli::{Cli, Command, generate_config_template},
    config::{Config, HostKeyChecking},
    handlers::{self, AppState},
    middleware::request_id_middleware,
    telemetry,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        match output {
            Some(path) => {
                std::fs::write(&path, generate_config_template())?;
                println!("Configuration template written to {}", path.display());
            }
            None => print!("{}", generate_config_template()),
        }
        return Ok(());
    }

    // Load configuration
    let config = Config::load(cli.config.as_deref(), cli.kubeconfig)?;

    // Initialize telemetry
    telemetry::init(&config.observability.log_level);

    // Fails fast when no kubeconfig was given
    let config = Arc::new(config);
    let state = AppState::new(config.clone())?;

    if config.uptime.host_key_checking == HostKeyChecking::Disabled {
        tracing::warn!(
            ssh_program = %config.uptime.ssh_program.display(),
            "Host key checking is disabled for the uptime lookup; any host key is accepted"
        );
    }

    let app = Router::new()
        .route("/", get(handlers::report::handler))
        .route("/{*path}", get(handlers::report::handler))
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));

    tracing::info!("Listening on {}", addr);
    tracing::info!(
        url = %config.scrape.url,
        family = %config.scrape.metric_family,
        "Scraping Prometheus metrics"
    );
    if let Some(kubeconfig) = config.uptime.kubeconfig() {
        tracing::info!(kubeconfig = %kubeconfig.display(), "Using kubeconfig");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
