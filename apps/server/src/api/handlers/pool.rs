//! Pool metadata handlers: version, health, identity and providers

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jmrl_pool_models::{PoolAttribute, PoolIdentity, PoolProviders, ProviderDetails};
use serde::Serialize;
use std::collections::HashMap;

use crate::{
    api::handlers::localized_json, i18n::Localizer, state::AppState, upstream::UpstreamHealth,
};

/// Build tag stamped by the release pipeline.
pub const BUILD: &str = match option_env!("JMRL_POOL_BUILD") {
    Some(build) => build,
    None => "unknown",
};

#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub build: &'static str,
}

pub async fn version_handler() -> Json<VersionInfo> {
    Json(VersionInfo {
        version: env!("CARGO_PKG_VERSION"),
        build: BUILD,
    })
}

/// Always 200; upstream trouble is reported in the body.
pub async fn healthcheck_handler(
    State(state): State<AppState>,
) -> Json<HashMap<String, UpstreamHealth>> {
    let health = state.sierra.ping().await;
    Json(HashMap::from([(state.config.library.name.clone(), health)]))
}

pub async fn identify_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let accept = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let localizer = Localizer::from_accept_language(accept);
    tracing::info!(
        accept_language = accept.unwrap_or_default(),
        "Identify request"
    );

    let library = &state.config.library;
    let identity = PoolIdentity {
        name: localizer.localize("PoolName"),
        description: localizer.localize("PoolDescription"),
        mode: "record".to_string(),
        attributes: vec![
            PoolAttribute::supported("logo_url", &library.logo_url),
            PoolAttribute::supported("external_url", &library.external_url),
            PoolAttribute::supported("external_hold", &library.external_url),
            PoolAttribute::unsupported("uva_ils"),
            PoolAttribute::unsupported("facets"),
            PoolAttribute::unsupported("cover_images"),
            PoolAttribute::unsupported("course_reserves"),
            PoolAttribute::unsupported("sorting"),
        ],
    };

    localized_json(StatusCode::OK, localizer.language(), identity)
}

/// Online-access providers named by `access_url` fields.
pub async fn providers_handler() -> Json<PoolProviders> {
    Json(PoolProviders {
        providers: vec![
            ProviderDetails {
                provider: "freading".to_string(),
                label: "Freading".to_string(),
                homepage_url: "https://freading.com/index".to_string(),
                logo_url: "/assets/freading.png".to_string(),
            },
            ProviderDetails {
                provider: "overdrive".to_string(),
                label: "Overdrive".to_string(),
                homepage_url: "https://www.overdrive.com".to_string(),
                logo_url: "/assets/overdrive.png".to_string(),
            },
        ],
    })
}

pub async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
