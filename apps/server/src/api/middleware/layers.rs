//! Layer factories for middleware

use axum::http::HeaderValue;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
};

/// CORS for the Virgo4 frontend. With no configured origins any origin is
/// allowed; otherwise only the listed ones.
pub fn cors(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let header_values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    if header_values.is_empty() {
        tracing::warn!(?origins, "No valid CORS origins configured; allowing any origin");
        return base.allow_origin(Any);
    }

    base.allow_origin(AllowOrigin::list(header_values))
}

/// Gzip response compression
pub fn compression() -> CompressionLayer {
    CompressionLayer::new()
}
