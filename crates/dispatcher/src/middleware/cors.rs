//! Permissive cross-origin headers for browser callers.
//!
//! The dispatcher is called straight from web clients with the store's
//! client headers attached, so every response (pre-flight included) allows
//! any origin and those request headers.

use axum::{
    extract::Request,
    http::{
        HeaderValue,
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN},
    },
    middleware::Next,
    response::Response,
};

/// Value of `Access-Control-Allow-Origin`.
pub const ALLOW_ORIGIN: &str = "*";

/// Value of `Access-Control-Allow-Headers`.
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Add the CORS headers to every response.
///
/// Headers applied:
/// - `Access-Control-Allow-Origin: *`
/// - `Access-Control-Allow-Headers: authorization, x-client-info, apikey, content-type`
pub async fn cors_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );

    response
}
