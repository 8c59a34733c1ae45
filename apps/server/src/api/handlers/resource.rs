//! Single record handler

use axum::{
    extract::{Path, State},
    Json,
};
use jmrl_pool_models::Record;

use crate::{state::AppState, Result};

/// `GET /api/resource/{id}`: one bib, normalized to record fields.
pub async fn resource_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>> {
    tracing::info!(id = %id, "Resource details requested");
    let bib = state.sierra.bib(&id).await?;
    let fields = jmrl_marc::normalize(&bib)?;
    Ok(Json(Record { fields }))
}
