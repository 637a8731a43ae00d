//! The action dispatcher endpoint.
//!
//! Answers pre-flight requests directly, otherwise parses the body into an
//! [`Action`] and hands it to the user service. Every outcome is a
//! [`ResponseEnvelope`]: 200 on success, 400 on any failure.

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::Method,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use artisan_users_core::{Action, ResponseEnvelope, Row};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Body of the pre-flight response.
pub const PREFLIGHT_BODY: &str = "ok";

/// Dispatch a request.
///
/// `OPTIONS` never touches the body or the store.
#[instrument(skip_all, fields(method = %method))]
pub async fn handle(
    State(state): State<AppState>,
    method: Method,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::OPTIONS {
        return PREFLIGHT_BODY.into_response();
    }

    match dispatch(&state, body).await {
        Ok(user) => Json(ResponseEnvelope::success(user)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn dispatch(
    state: &AppState,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Row> {
    let body = body.map_err(|e| AppError::Body(e.body_text()))?;
    let action = Action::from_json(&body)?;
    state.users().dispatch(action).await
}
