//! Unified error handling with Sentry integration.
//!
//! Every failure a dispatched request can hit is an [`AppError`]. Whatever its
//! origin, it is answered the same way: HTTP 400 with
//! `{"success": false, "error": "<message>"}`. Store-side failures are also
//! captured to Sentry before responding, once: the capture here is the only
//! Sentry event for a plain store failure, and a partial write adds the
//! `error!` logged where it happens.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sentry::integrations::tracing::EventFilter;
use thiserror::Error;

use artisan_users_core::{ActionError, ResponseEnvelope, Row, RowId};

use crate::store::StoreError;

/// Application-level error type for the dispatcher.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request body could not be read.
    #[error("could not read request body: {0}")]
    Body(String),

    /// The body is not a valid `{action, userData}` payload.
    #[error(transparent)]
    Request(#[from] ActionError),

    /// The action name is not one the dispatcher supports.
    #[error("Invalid action")]
    InvalidAction(String),

    /// The store rejected a read or write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store created a user but returned no usable `id`.
    #[error("created user row has no usable id")]
    MissingUserId(Row),

    /// The user row was written, the artisan profile was not.
    #[error("user {user_id} was created but creating the artisan profile failed: {source}")]
    ArtisanProfile {
        user_id: RowId,
        user: Row,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    /// Whether the failure came from the store rather than the caller's input.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::MissingUserId(_) | Self::ArtisanProfile { .. }
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_store_failure() {
            let event_id = sentry::capture_error(&self);
            tracing::info!(
                error = %self,
                sentry_event_id = %event_id,
                "Dispatch failed"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let message = self.to_string();
        let envelope = match self {
            // The user row is committed; hand it back so the caller can recover
            Self::ArtisanProfile { user, .. } => ResponseEnvelope::failure(message).with_data(user),
            _ => ResponseEnvelope::failure(message),
        };

        (StatusCode::BAD_REQUEST, Json(envelope)).into_response()
    }
}

/// Map tracing levels to Sentry: errors and warnings become events,
/// info and debug become breadcrumbs.
pub fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
