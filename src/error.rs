//! Error types for Quant
//!
//! `AppError` covers startup and request-fatal failures and implements
//! `IntoResponse` for Axum handlers. Failures of the uptime lookup live in
//! [`crate::uptime::UptimeError`] and never surface as HTTP errors.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read configuration file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML configuration {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Metrics endpoint {url} is unavailable: {reason}")]
    MetricsUnavailable { url: String, reason: String },

    #[error("Metrics endpoint {url} did not respond within {timeout_seconds} seconds")]
    MetricsTimeout { url: String, timeout_seconds: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MetricsUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::MetricsTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. }
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("error: {}\n", self),
        )
            .into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
