//! Row store access.
//!
//! The dispatcher only needs two writes, so the store is modelled as a small
//! trait. [`RestStore`] talks to the hosted backend over its REST API; tests
//! substitute an in-memory implementation.
//!
//! # Tables
//!
//! - `users` - One row per user; columns are passed through from the caller
//! - `artisans` - Profile row keyed by `user_id`, created for artisan users

mod rest;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use artisan_users_core::{Row, RowId};

pub use rest::RestStore;

/// Errors returned by a [`RowStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the request (constraint violation, no matching row, ...).
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The store answered with a body that is not a single row.
    #[error("unexpected store response: {0}")]
    Decode(String),

    /// The client could not be built from configuration.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

/// Tables the dispatcher writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Artisans,
}

impl Table {
    /// Table name as used in REST paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Artisans => "artisans",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-oriented store client.
///
/// Both writes ask for exactly one row back; zero or several matching rows
/// are reported as errors by the implementation.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Insert one row and return it as stored (including generated columns).
    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError>;

    /// Apply `patch` to the row whose `id` equals `id` and return the updated row.
    async fn update(&self, table: Table, patch: Row, id: &RowId) -> Result<Row, StoreError>;

    /// Check that the store is reachable with the configured credentials.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Users.as_str(), "users");
        assert_eq!(Table::Artisans.to_string(), "artisans");
    }

    #[test]
    fn test_api_error_displays_store_message() {
        let err = StoreError::Api {
            status: 409,
            message: "duplicate key value violates unique constraint \"users_pkey\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate key value violates unique constraint \"users_pkey\""
        );
    }
}
