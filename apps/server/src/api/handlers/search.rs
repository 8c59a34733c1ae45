//! Search handler
//!
//! Binds the pool search request, translates its query into Sierra syntax,
//! runs one upstream page and wraps each hit as a single-record group.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jmrl_marc::SearchPage;
use jmrl_pool_models::{has_facet_selection, Group, Pagination, PoolResult, Record, SearchRequest};
use jmrl_query::{TranslatedQuery, Translation};
use std::time::Instant;

use crate::{
    api::handlers::localized_json, auth::AuthenticatedPrincipal, error::Error, i18n::Localizer,
    metrics::QUERY_TRANSLATIONS_TOTAL, state::AppState,
};

pub async fn search_handler(
    State(state): State<AppState>,
    principal: Option<AuthenticatedPrincipal>,
    headers: HeaderMap,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => return Error::InvalidRequest(rejection.body_text()).into_response(),
    };
    let language = Localizer::from_accept_language(
        headers
            .get(axum::http::header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok()),
    )
    .language();

    tracing::info!(
        query = %req.query,
        start = req.pagination.start,
        rows = req.pagination.rows,
        user = principal.as_ref().map(|p| p.0.user_id.as_str()).unwrap_or_default(),
        "Search requested"
    );

    if has_facet_selection(&req.filters) {
        tracing::info!("Filters specified in search, returning no matches");
        return localized_json(StatusCode::OK, language, PoolResult::empty("low"));
    }

    let query = match translate(&state, &req.query) {
        Ok(Translation::Upstream(query)) => query,
        Ok(Translation::MatchNothing) => {
            tracing::info!("Query selects filters, returning no matches");
            return localized_json(StatusCode::OK, language, PoolResult::empty("low"));
        }
        Err(err) => return err.into_response(),
    };

    let start = Instant::now();
    let result = state.sierra.search(&query, req.pagination.start).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let mut pool_result = match result {
        Ok(page) => envelope(page),
        Err(err) => {
            let status = err.status();
            if matches!(err, Error::UpstreamParse(_)) {
                tracing::error!(error = %err, "Invalid response from Sierra API");
            }
            let mut failed = PoolResult::failed(status.as_u16(), err.message());
            failed.elapsed_ms = elapsed_ms;
            return localized_json(status, language, failed);
        }
    };
    pool_result.elapsed_ms = elapsed_ms;
    pool_result.content_language = language.to_string();

    tracing::info!(
        total = pool_result.pagination.total,
        groups = pool_result.groups.len(),
        elapsed_ms,
        "Search complete"
    );
    localized_json(StatusCode::OK, language, pool_result)
}

fn translate(state: &AppState, raw: &str) -> Result<Translation, Error> {
    let options = state.config.query.translate_options();
    let outcome = jmrl_query::translate_with(raw, &options);

    let label = match &outcome {
        Ok(Translation::Upstream(_)) => "ok",
        Ok(Translation::MatchNothing) => "match_nothing",
        Err(jmrl_query::Error::Unsupported { .. }) => "unsupported",
        Err(_) => "malformed",
    };
    QUERY_TRANSLATIONS_TOTAL.with_label_values(&[label]).inc();

    if let Ok(Translation::Upstream(translated)) = &outcome {
        log_translation(raw, translated);
    }
    outcome.map_err(Error::from)
}

fn log_translation(raw: &str, translated: &TranslatedQuery) {
    tracing::info!(raw = %raw, translated = %translated, "Parsed query");
}

/// Pool result for one Sierra page. Hits that cannot be normalized are
/// dropped with a warning.
fn envelope(page: SearchPage) -> PoolResult {
    let groups: Vec<Group> = page
        .entries
        .iter()
        .filter_map(|entry| match jmrl_marc::normalize(&entry.bib) {
            Ok(fields) => Some(Group::singleton(entry.bib.id.clone(), Record { fields })),
            Err(err) => {
                tracing::warn!(error = %err, "Skipping search hit");
                None
            }
        })
        .collect();

    let confidence = if page.total > 0 { "medium" } else { "low" };
    PoolResult {
        pagination: Pagination {
            start: page.start,
            rows: page.count,
            total: page.total,
        },
        groups,
        ..PoolResult::empty(confidence)
    }
}
