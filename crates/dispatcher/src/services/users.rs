//! User operations behind the dispatcher.
//!
//! `createUser` performs up to two sequential inserts: the user row, then
//! the artisan profile keyed by the new user's id. The two writes are not
//! atomic. When the second one fails the user row stays committed and the
//! failure is reported as [`AppError::ArtisanProfile`], carrying the created
//! row, so callers can tell a partial write from a clean failure.

use std::sync::Arc;

use tracing::instrument;

use artisan_users_core::{Action, ArtisanDraft, CreateUserInput, Row, RowId, UpdateUserInput};

use crate::error::AppError;
use crate::store::{RowStore, Table};

/// Executes dispatched actions against a row store.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn RowStore>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    /// The underlying row store.
    #[must_use]
    pub fn store(&self) -> &dyn RowStore {
        self.store.as_ref()
    }

    /// Run an action and return the affected user row.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidAction` for unsupported actions, and the
    /// errors of [`UserService::create_user`] / [`UserService::update_user`]
    /// otherwise.
    #[instrument(skip_all, fields(action = %action.name()))]
    pub async fn dispatch(&self, action: Action) -> Result<Row, AppError> {
        match action {
            Action::CreateUser(input) => self.create_user(input).await,
            Action::UpdateUser(input) => self.update_user(input).await,
            Action::Unsupported(name) => {
                tracing::info!(action = %name, "Rejected unsupported action");
                Err(AppError::InvalidAction(name))
            }
        }
    }

    /// Insert a user row, plus an artisan row when `is_artisan` is truthy.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the user insert fails,
    /// `AppError::MissingUserId` if the created row has no usable `id`, and
    /// `AppError::ArtisanProfile` if the artisan insert fails after the user
    /// row was written.
    pub async fn create_user(&self, input: CreateUserInput) -> Result<Row, AppError> {
        let user = self
            .store
            .insert(Table::Users, input.fields.clone())
            .await?;

        if !input.is_artisan() {
            tracing::info!(user_id = ?user.get("id"), "User created");
            return Ok(user);
        }

        let user_id = user
            .get("id")
            .and_then(RowId::from_value)
            .ok_or_else(|| AppError::MissingUserId(user.clone()))?;

        let draft = ArtisanDraft::for_user(user_id.clone(), &input);
        if let Err(source) = self.store.insert(Table::Artisans, draft.into_row()).await {
            tracing::error!(
                user_id = %user_id,
                error = %source,
                "User created but artisan profile insert failed"
            );
            return Err(AppError::ArtisanProfile {
                user_id,
                user,
                source,
            });
        }

        tracing::info!(user_id = %user_id, "Artisan user created");
        Ok(user)
    }

    /// Apply `updates` to the user row with id `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the update fails or matches no row.
    pub async fn update_user(&self, input: UpdateUserInput) -> Result<Row, AppError> {
        let user = self
            .store
            .update(Table::Users, input.updates, &input.user_id)
            .await?;

        tracing::info!(user_id = %input.user_id, "User updated");
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::response::IntoResponse;
    use serde_json::{Value, json};
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;
    use crate::store::StoreError;

    /// Store that hands out sequential ids and can fail one table.
    #[derive(Default)]
    struct FakeStore {
        calls: Mutex<Vec<(Table, Row)>>,
        fail_table: Option<Table>,
        omit_id: bool,
    }

    #[async_trait]
    impl RowStore for FakeStore {
        async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((table, row.clone()));
            if self.fail_table == Some(table) {
                return Err(StoreError::Api {
                    status: 409,
                    message: format!("{table} insert rejected"),
                });
            }
            let mut stored = row;
            if !self.omit_id {
                stored.insert("id".to_string(), json!(calls.len()));
            }
            Ok(stored)
        }

        async fn update(&self, table: Table, patch: Row, id: &RowId) -> Result<Row, StoreError> {
            self.calls.lock().unwrap().push((table, patch.clone()));
            let mut stored = patch;
            stored.insert("id".to_string(), id.to_value());
            Ok(stored)
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn service(store: FakeStore) -> (UserService, Arc<FakeStore>) {
        let store = Arc::new(store);
        (UserService::new(store.clone()), store)
    }

    fn create(value: &Value) -> Action {
        Action::CreateUser(CreateUserInput {
            fields: value.as_object().unwrap().clone(),
        })
    }

    #[tokio::test]
    async fn test_create_plain_user_inserts_once() {
        let (svc, store) = service(FakeStore::default());

        let user = svc
            .dispatch(create(&json!({"full_name": "Sam", "is_artisan": false})))
            .await
            .unwrap();

        assert_eq!(user.get("id"), Some(&json!(1)));
        let calls = store.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Table::Users);
    }

    #[tokio::test]
    async fn test_create_artisan_inserts_profile_with_new_id() {
        let (svc, store) = service(FakeStore::default());

        svc.dispatch(create(&json!({"full_name": "Jane Doe", "is_artisan": true})))
            .await
            .unwrap();

        let calls = store.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, Table::Artisans);
        assert_eq!(
            Value::Object(calls[1].1.clone()),
            json!({"user_id": 1, "business_name": "Jane Doe", "craft_specialty": "General"})
        );
    }

    #[tokio::test]
    async fn test_user_insert_failure_skips_profile() {
        let (svc, store) = service(FakeStore {
            fail_table: Some(Table::Users),
            ..FakeStore::default()
        });

        let err = svc
            .dispatch(create(&json!({"is_artisan": true})))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Store(_)));
        assert_eq!(store.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_profile_failure_reports_created_user() {
        let (svc, _store) = service(FakeStore {
            fail_table: Some(Table::Artisans),
            ..FakeStore::default()
        });

        let err = svc
            .dispatch(create(&json!({"full_name": "Jane", "is_artisan": true})))
            .await
            .unwrap_err();

        let AppError::ArtisanProfile { user_id, user, .. } = err else {
            panic!("expected partial failure, got {err:?}");
        };
        assert_eq!(user_id, RowId::Int(1));
        assert_eq!(user.get("full_name"), Some(&json!("Jane")));
    }

    #[test]
    fn test_partial_write_reaches_sentry_twice() {
        let (svc, _store) = service(FakeStore {
            fail_table: Some(Table::Artisans),
            ..FakeStore::default()
        });
        let subscriber = tracing_subscriber::registry().with(
            sentry::integrations::tracing::layer()
                .event_filter(crate::error::sentry_event_filter),
        );

        let events = sentry::test::with_captured_events(|| {
            tracing::subscriber::with_default(subscriber, || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                let action = create(&json!({"full_name": "Jane", "is_artisan": true}));
                let err = runtime.block_on(svc.dispatch(action)).unwrap_err();
                let _ = err.into_response();
            });
        });

        // The `error!` at the failure site, then the capture in `into_response`
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_artisan_without_returned_id_fails() {
        let (svc, store) = service(FakeStore {
            omit_id: true,
            ..FakeStore::default()
        });

        let err = svc
            .dispatch(create(&json!({"is_artisan": true})))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MissingUserId(_)));
        assert_eq!(store.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_user() {
        let (svc, store) = service(FakeStore::default());

        let user = svc
            .dispatch(Action::UpdateUser(UpdateUserInput {
                user_id: RowId::Int(42),
                updates: json!({"full_name": "New Name"}).as_object().unwrap().clone(),
            }))
            .await
            .unwrap();

        assert_eq!(
            Value::Object(user),
            json!({"id": 42, "full_name": "New Name"})
        );
        assert_eq!(store.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_action_makes_no_calls() {
        let (svc, store) = service(FakeStore::default());

        let err = svc
            .dispatch(Action::Unsupported("deleteUser".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid action");
        assert!(store.calls.lock().unwrap().is_empty());
    }
}
