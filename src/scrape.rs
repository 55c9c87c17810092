//! Metrics source client
//!
//! Fetches the Prometheus text exposition that each report is built from.

use crate::config::ScrapeConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use std::time::Duration;

/// HTTP client bound to one metrics endpoint
#[derive(Debug, Clone)]
pub struct MetricsSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl MetricsSource {
    /// Build a client whose requests are cut off after `scrape.timeout_seconds`
    pub fn new(config: &ScrapeConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            timeout: config.timeout(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the full scrape body
    ///
    /// A deadline expiry maps to [`AppError::MetricsTimeout`]; connection
    /// failures and non-success statuses map to
    /// [`AppError::MetricsUnavailable`].
    pub async fn fetch(&self, request_id: RequestId) -> AppResult<String> {
        tracing::debug!(request_id = %request_id, url = %self.url, "Scraping metrics");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(request_id, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                request_id = %request_id,
                url = %self.url,
                status = %status,
                "Metrics endpoint returned an error status"
            );
            return Err(AppError::MetricsUnavailable {
                url: self.url.clone(),
                reason: format!("unexpected status {}", status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.classify(request_id, e))?;

        tracing::debug!(
            request_id = %request_id,
            bytes = body.len(),
            "Metrics scrape complete"
        );
        Ok(body)
    }

    fn classify(&self, request_id: RequestId, error: reqwest::Error) -> AppError {
        tracing::warn!(
            request_id = %request_id,
            url = %self.url,
            error = %error,
            timeout = error.is_timeout(),
            "Metrics scrape failed"
        );
        if error.is_timeout() {
            AppError::MetricsTimeout {
                url: self.url.clone(),
                timeout_seconds: self.timeout.as_secs(),
            }
        } else {
            AppError::MetricsUnavailable {
                url: self.url.clone(),
                reason: error.to_string(),
            }
        }
    }
}
