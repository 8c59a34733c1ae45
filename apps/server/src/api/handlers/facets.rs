//! Facet handler
//!
//! Sierra has no facet support; the pool always answers with an empty list.

use axum::Json;
use jmrl_pool_models::FacetsResponse;

pub async fn facets_handler() -> Json<FacetsResponse> {
    tracing::info!("Facets requested, but Sierra does not support them; returning empty list");
    Json(FacetsResponse::default())
}
