//! Request ID middleware for correlating logs with requests.
//!
//! Every request gets a UUID v4 and a tracing span covering the handler and
//! any outbound calls it makes. The ID is echoed in the `x-request-id`
//! response header so clients can quote it when reporting a failure.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use axum::http::header::{HeaderName, HeaderValue};
use tracing::Instrument;
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID, available to handlers through request extensions.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Outermost layer: wraps the request in a span and records its outcome.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    );

    request.extensions_mut().insert(RequestId(request_id));
    let start = Instant::now();

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        let status = response.status().as_u16();

        let span = tracing::Span::current();
        span.record("status", status);
        span.record("duration_ms", duration_ms);

        if response.status().is_server_error() {
            tracing::warn!(status, duration_ms, "Request completed with error");
        } else {
            tracing::info!(status, duration_ms, "Request completed");
        }

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER.clone(), value);
        }

        response
    }
    .instrument(span)
    .await
}
