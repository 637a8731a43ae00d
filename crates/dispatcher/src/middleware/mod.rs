//! HTTP middleware stack for the dispatcher.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS headers (dispatcher routes only)

pub mod cors;
pub mod request_id;

pub use cors::{ALLOW_HEADERS, ALLOW_ORIGIN, cors_headers_middleware};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
