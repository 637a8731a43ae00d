//! Integration tests for the artisan users dispatcher.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p artisan-users-integration-tests
//! ```
//!
//! No external services are needed: the router is driven in-process, and
//! the store is either a [`RecordingStore`] or a fake REST backend started
//! on an ephemeral port.
//!
//! # Test Categories
//!
//! - `dispatch_contract` - HTTP contract of the dispatcher endpoint
//! - `rest_backend` - Full stack against a fake REST row store

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header::CONTENT_TYPE};
use serde_json::{Value, json};
use tower::ServiceExt;

use artisan_users_core::{Row, RowId};
use artisan_users_dispatcher::routes;
use artisan_users_dispatcher::state::AppState;
use artisan_users_dispatcher::store::{RowStore, StoreError, Table};

// =============================================================================
// Recording Store
// =============================================================================

/// A store call, in the order it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Insert { table: Table, row: Row },
    Update { table: Table, patch: Row, id: RowId },
}

impl Call {
    /// Table the call targeted.
    #[must_use]
    pub const fn table(&self) -> Table {
        match self {
            Self::Insert { table, .. } | Self::Update { table, .. } => *table,
        }
    }
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    rows: HashMap<(Table, String), Row>,
}

/// In-memory row store that records every call.
///
/// Inserts get sequential integer ids starting at 1. Updates only match
/// rows that were inserted or seeded, like a real single-object request.
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<Call>>,
    tables: Mutex<Tables>,
    failures: HashMap<Table, String>,
    unreachable: bool,
}

impl RecordingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call against `table` fail with `message`.
    #[must_use]
    pub fn failing_on(mut self, table: Table, message: &str) -> Self {
        self.failures.insert(table, message.to_string());
        self
    }

    /// Make `ping` fail.
    #[must_use]
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Seed a user row; it must carry an `id`.
    ///
    /// # Panics
    ///
    /// Panics if the row has no `id`.
    #[must_use]
    pub fn with_user(self, row: &Value) -> Self {
        let row = row.as_object().expect("seed row must be an object").clone();
        let id = row.get("id").expect("seed row must have an id").to_string();
        self.tables
            .lock()
            .expect("store lock poisoned")
            .rows
            .insert((Table::Users, id), row);
        self
    }

    /// Every call made so far.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("store lock poisoned").clone()
    }

    fn record(&self, call: Call) -> Result<(), StoreError> {
        let table = call.table();
        self.calls.lock().expect("store lock poisoned").push(call);
        match self.failures.get(&table) {
            Some(message) => Err(StoreError::Api {
                status: 409,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RowStore for RecordingStore {
    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        self.record(Call::Insert {
            table,
            row: row.clone(),
        })?;

        let mut tables = self.tables.lock().expect("store lock poisoned");
        tables.next_id += 1;
        let mut stored = row;
        stored
            .entry("id")
            .or_insert_with(|| json!(tables.next_id));
        let key = (table, stored["id"].to_string());
        tables.rows.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update(&self, table: Table, patch: Row, id: &RowId) -> Result<Row, StoreError> {
        self.record(Call::Update {
            table,
            patch: patch.clone(),
            id: id.clone(),
        })?;

        let mut tables = self.tables.lock().expect("store lock poisoned");
        let Some(stored) = tables.rows.get_mut(&(table, id.to_value().to_string())) else {
            return Err(StoreError::Api {
                status: 406,
                message: "JSON object requested, multiple (or no) rows returned".to_string(),
            });
        };
        stored.extend(patch);
        Ok(stored.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.unreachable {
            return Err(StoreError::Api {
                status: 503,
                message: "store unreachable".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Test App
// =============================================================================

/// Response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    /// Body as text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// A response header as a string, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The full application router wired to a given store.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Build the application around a store.
    #[must_use]
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            router: routes::app(AppState::new(store)),
        }
    }

    /// Send a request with a raw body to `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn send(&self, method: Method, path: &str, body: impl Into<Body>) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(body.into())
            .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// POST a JSON payload to the dispatcher.
    pub async fn dispatch(&self, payload: &Value) -> TestResponse {
        self.send(Method::POST, "/", payload.to_string()).await
    }
}
