//! Request ID middleware for correlating dispatcher logs and Sentry events.
//!
//! Dispatcher calls usually arrive through a function gateway that already
//! stamps `x-request-id`. That id is kept when it is a short, printable
//! token; anything else (empty, oversized, control characters) is replaced
//! with a fresh UUID v4 so a caller cannot inject arbitrary text into logs.
//!
//! The id fills the `request_id` field of the `http_request` span opened by
//! the router's `TraceLayer`, tags the Sentry scope, and is echoed back.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id that is reused verbatim.
pub const MAX_REQUEST_ID_LEN: usize = 128;

fn is_usable(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Middleware that ensures every request has a usable request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| is_usable(id))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
