//! Prometheus metrics for the pool service

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, register_int_gauge_vec,
    HistogramVec, IntCounterVec, IntGauge, IntGaugeVec,
};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "jmrl_pool_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "jmrl_pool_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "jmrl_pool_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    // Upstream (Sierra) Metrics

    /// Upstream calls by endpoint (search, bib, token, about) and status code
    pub static ref UPSTREAM_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "jmrl_pool_upstream_requests_total",
        "Total number of requests sent to the Sierra API",
        &["endpoint", "status"]
    )
    .expect("Failed to register UPSTREAM_REQUESTS_TOTAL");

    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "jmrl_pool_upstream_request_duration_seconds",
        "Sierra API request duration in seconds",
        &["endpoint"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register UPSTREAM_REQUEST_DURATION_SECONDS");

    pub static ref TOKEN_REFRESHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "jmrl_pool_token_refreshes_total",
        "Sierra access token refreshes by outcome",
        &["outcome"]
    )
    .expect("Failed to register TOKEN_REFRESHES_TOTAL");

    /// Lifetime left on the shared Sierra token, sampled at scrape time
    pub static ref SIERRA_TOKEN_SECONDS_REMAINING: IntGauge = register_int_gauge!(
        "jmrl_pool_sierra_token_seconds_remaining",
        "Seconds until the cached Sierra access token expires"
    )
    .expect("Failed to register SIERRA_TOKEN_SECONDS_REMAINING");

    pub static ref BUILD_INFO: IntGaugeVec = register_int_gauge_vec!(
        "jmrl_pool_build_info",
        "Pool build information",
        &["version", "build"]
    )
    .expect("Failed to register BUILD_INFO");

    // Query Metrics

    /// Query translations by outcome: ok, match_nothing, unsupported, malformed
    pub static ref QUERY_TRANSLATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "jmrl_pool_query_translations_total",
        "Pool query translations by outcome",
        &["outcome"]
    )
    .expect("Failed to register QUERY_TRANSLATIONS_TOTAL");
}

/// Routed paths, used verbatim as the `path` label.
const ROUTES: [&str; 8] = [
    "/version",
    "/healthcheck",
    "/identify",
    "/favicon.ico",
    "/metrics",
    "/api/search",
    "/api/search/facets",
    "/api/providers",
];

/// Map a request path to its route template so label cardinality stays
/// bounded. Anything the router does not serve is labelled `/other`.
pub fn sanitize_path(path: &str) -> &'static str {
    if let Some(route) = ROUTES.iter().copied().find(|route| *route == path) {
        return route;
    }
    match path.strip_prefix("/api/resource/") {
        Some(id) if !id.is_empty() && !id.contains('/') => "/api/resource/{id}",
        _ => "/other",
    }
}

pub fn record_upstream(endpoint: &str, status: u16, seconds: f64) {
    UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[endpoint, &status.to_string()])
        .inc();
    UPSTREAM_REQUEST_DURATION_SECONDS
        .with_label_values(&[endpoint])
        .observe(seconds);
}
