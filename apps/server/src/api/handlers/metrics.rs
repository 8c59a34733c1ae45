//! Metrics endpoint handler

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use prometheus::{Encoder, TextEncoder};

use crate::{
    api::handlers::pool::BUILD,
    metrics::{BUILD_INFO, SIERRA_TOKEN_SECONDS_REMAINING},
    state::AppState,
};

/// Prometheus text exposition. Gauges that describe pool state rather than
/// traffic are sampled here, just before gathering.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let remaining = state.sierra.tokens().seconds_remaining().await;
    SIERRA_TOKEN_SECONDS_REMAINING.set(i64::try_from(remaining).unwrap_or(i64::MAX));
    BUILD_INFO
        .with_label_values(&[env!("CARGO_PKG_VERSION"), BUILD])
        .set(1);

    let mut buffer = vec![];
    match TextEncoder::new().encode(&prometheus::gather(), &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("Content-Type", "text/plain")],
                b"Failed to encode metrics".to_vec(),
            )
        }
    }
}
