//! HTTP route handlers for the dispatcher.
//!
//! # Route Structure
//!
//! ```text
//! ANY  /               - Dispatch `{action, userData}` (OPTIONS answers pre-flight)
//! ANY  /users          - Same dispatcher, for function-style mounting
//! GET  /health         - Liveness check
//! GET  /health/ready   - Readiness check (store reachable)
//! ```

pub mod dispatch;
pub mod health;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    middleware::from_fn,
    routing::{any, get},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_headers_middleware, request_id_middleware};
use crate::state::AppState;

/// Largest request body the dispatcher will read.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the dispatcher routes router.
///
/// Every response from these routes carries the CORS headers.
pub fn dispatcher_routes() -> Router<AppState> {
    Router::new()
        .route("/", any(dispatch::handle))
        .route("/users", any(dispatch::handle))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn(cors_headers_middleware))
}

/// Create the health check routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Build the complete application with tracing and request IDs.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(dispatcher_routes())
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use artisan_users_core::{Row, RowId};

    use super::*;
    use crate::middleware::{ALLOW_HEADERS, ALLOW_ORIGIN, REQUEST_ID_HEADER};
    use crate::store::{RowStore, StoreError, Table};

    /// Store that refuses every call.
    struct DownStore;

    fn down() -> StoreError {
        StoreError::Api {
            status: 503,
            message: "store down".to_string(),
        }
    }

    #[async_trait]
    impl RowStore for DownStore {
        async fn insert(&self, _table: Table, _row: Row) -> Result<Row, StoreError> {
            Err(down())
        }

        async fn update(&self, _table: Table, _patch: Row, _id: &RowId) -> Result<Row, StoreError> {
            Err(down())
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Err(down())
        }
    }

    async fn call(method: Method, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        app(AppState::new(Arc::new(DownStore)))
            .oneshot(request)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_preflight_carries_cors_headers() {
        let response = call(Method::OPTIONS, "/users", "").await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOW_ORIGIN);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
        assert!(headers.contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_store_failure_is_json_bad_request() {
        let body = json!({"action": "createUser", "userData": {"full_name": "Ann"}});
        let response = call(Method::POST, "/", &body.to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"success": false, "error": "store down"}));
    }

    #[tokio::test]
    async fn test_health_routes_skip_cors_headers() {
        let response = call(Method::GET, "/health", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

        let response = call(Method::GET, "/health/ready", "").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
