//! HTTP request handlers

pub mod facets;
pub mod metrics;
pub mod pool;
pub mod resource;
pub mod search;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON response with a `Content-Language` header.
pub(crate) fn localized_json<T: Serialize>(status: StatusCode, language: &str, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(language) {
        response.headers_mut().insert(header::CONTENT_LANGUAGE, value);
    }
    response
}
