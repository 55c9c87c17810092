//! Request-count report endpoint
//!
//! Every GET scrapes the metrics source, ranks API server clients by request
//! count and streams a plain-text report. The control-plane uptime lookup
//! runs alongside the scrape and is given a bounded wait before the report
//! starts.

use crate::error::AppError;
use crate::handlers::AppState;
use crate::middleware::RequestId;
use crate::quantify::quantify;
use crate::render;
use crate::uptime::{SideFetch, SideFetchOutcome};
use axum::{
    Extension,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::stream::{self, StreamExt};
use std::convert::Infallible;

/// GET handler for the report
///
/// # Response
///
/// - `200 OK` with a `text/plain` body: the uptime section first, then one
///   section per client, busiest first. The status is always 200 once the
///   scrape succeeds, even when the uptime lookup fails or times out. Headers
///   are sent before the lookup resolves, so its outcome is only reported
///   inside the body.
/// - `502 Bad Gateway` if the metrics source cannot be scraped
/// - `504 Gateway Timeout` if the scrape exceeds `scrape.timeout_seconds`
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Response, AppError> {
    let uptime = state.uptime();
    let side_fetch = SideFetch::launch(async move { uptime.fetch().await });

    // On error the side fetch handle is dropped and the lookup is abandoned
    let scrape = state.source().fetch(request_id).await?;

    let family = &state.config().scrape.metric_family;
    let clients = quantify(&scrape, family);

    tracing::info!(
        request_id = %request_id,
        family = %family,
        clients = clients.len(),
        "Ranked API server clients"
    );

    let wait = state.config().uptime.wait();
    let uptime_chunk = stream::once(async move {
        let outcome = side_fetch.wait(wait).await;
        match &outcome {
            SideFetchOutcome::Completed(Ok(_)) => {
                tracing::debug!(request_id = %request_id, "Uptime lookup completed");
            }
            SideFetchOutcome::Completed(Err(e)) => {
                tracing::warn!(request_id = %request_id, error = %e, "Uptime lookup failed");
            }
            SideFetchOutcome::TimedOut => {
                tracing::warn!(
                    request_id = %request_id,
                    wait_ms = wait.as_millis() as u64,
                    "Uptime lookup timed out"
                );
            }
            SideFetchOutcome::Dropped => {
                tracing::error!(
                    request_id = %request_id,
                    "Uptime lookup task ended without a result"
                );
            }
        }
        Ok::<_, Infallible>(render::uptime_section(&outcome))
    });
    let client_chunks = stream::iter(
        clients
            .into_iter()
            .map(|client| Ok::<_, Infallible>(render::client_section(&client))),
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(uptime_chunk.chain(client_chunks)),
    )
        .into_response())
}
