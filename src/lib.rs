//! Quant - API server request counts, ranked by client
//!
//! This library scrapes a Prometheus text endpoint, aggregates the
//! `apiserver_request_count` family per client and serves a ranked
//! plain-text report, prefixed with the control-plane uptime when it can
//! be fetched in time.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod quantify;
pub mod render;
pub mod scrape;
pub mod telemetry;
pub mod uptime;
