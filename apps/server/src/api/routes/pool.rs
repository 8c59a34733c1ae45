//! Pool protocol routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::{facets, metrics, pool, resource, search};
use crate::state::AppState;

/// Unauthenticated service endpoints.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/version", get(pool::version_handler))
        .route("/healthcheck", get(pool::healthcheck_handler))
        .route("/identify", get(pool::identify_handler))
        .route("/favicon.ico", get(pool::favicon))
        .route("/metrics", get(metrics::metrics_handler))
}

/// Routes nested under `/api`, behind bearer authentication.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", post(search::search_handler))
        .route("/search/facets", post(facets::facets_handler))
        .route("/resource/:id", get(resource::resource_handler))
        .route("/providers", get(pool::providers_handler))
}
