//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::DispatcherConfig;
use crate::services::UserService;
use crate::store::{RestStore, RowStore, StoreError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds nothing mutable:
/// every request gets its own rows and the store client is safe to share.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    users: UserService,
}

impl AppState {
    /// Create application state around an existing store.
    #[must_use]
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                users: UserService::new(store),
            }),
        }
    }

    /// Create application state backed by the hosted REST store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store client cannot be built from the
    /// configured URL and service key.
    pub fn from_config(config: &DispatcherConfig) -> Result<Self, StoreError> {
        let store = RestStore::new(&config.store)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Get a reference to the user service.
    #[must_use]
    pub fn users(&self) -> &UserService {
        &self.inner.users
    }
}
