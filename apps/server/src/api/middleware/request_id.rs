//! Request ID middleware

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Server-assigned id of the current request, available as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Assigns `x-request-id` to every response and runs the request inside a
/// span carrying it. A client-supplied id is echoed back as
/// `x-correlation-id`.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let start = Instant::now();

    let client_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let server_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(server_id.clone()));

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = tracing::info_span!(
        "http_request",
        http.method = %method,
        http.route = %path,
        request_id = %server_id,
    );

    tracing::debug!(parent: &span, "Incoming request");
    let mut response = next.run(req).instrument(span.clone()).await;

    let status = response.status();
    tracing::info!(
        parent: &span,
        status = status.as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&server_id) {
        headers.insert("x-request-id", value);
    }
    if let Some(client_id) = client_id {
        if client_id != server_id {
            if let Ok(value) = HeaderValue::from_str(&client_id) {
                headers.insert("x-correlation-id", value);
            }
        }
    }

    response
}
