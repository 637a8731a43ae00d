//! REST client for the hosted row store.
//!
//! Speaks the PostgREST dialect exposed under `{SUPABASE_URL}/rest/v1`:
//! - `POST /rest/v1/{table}` inserts
//! - `PATCH /rest/v1/{table}?id=eq.{id}` updates
//!
//! Every write sends `Prefer: return=representation` together with the
//! single-object media type, so the backend returns the affected row and
//! rejects the call when zero or several rows match.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use artisan_users_core::{Row, RowId};

use super::{RowStore, StoreError, Table};
use crate::config::StoreConfig;

/// Media type asking for exactly one row as a bare JSON object.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Ask the backend to echo the written row.
const RETURN_REPRESENTATION: &str = "return=representation";

/// Row store client backed by the hosted REST API.
#[derive(Clone)]
pub struct RestStore {
    client: reqwest::Client,
    rest_base: Url,
}

impl RestStore {
    /// Create a new REST store client.
    ///
    /// The service key is sent on every request as both the `apikey` header
    /// and a bearer token.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let key = config.service_key.expose_secret();
        let mut headers = HeaderMap::new();

        let mut apikey = HeaderValue::from_str(key)
            .map_err(|e| StoreError::Config(format!("invalid service key format: {e}")))?;
        apikey.set_sensitive(true);
        headers.insert("apikey", apikey);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| StoreError::Config(format!("invalid service key format: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            rest_base: rest_base(&config.url)?,
        })
    }

    /// URL of a table endpoint.
    fn table_url(&self, table: Table) -> Result<Url, StoreError> {
        self.rest_base
            .join(table.as_str())
            .map_err(|e| StoreError::Config(format!("invalid table url: {e}")))
    }

    /// Turn a write response into the single row it carries.
    async fn single_row(response: reqwest::Response) -> Result<Row, StoreError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        response
            .json::<Row>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl RowStore for RestStore {
    #[instrument(skip(self, row), fields(table = %table))]
    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        let url = self.table_url(table)?;
        tracing::debug!(columns = row.len(), "Inserting row");

        let response = self
            .client
            .post(url)
            .header("prefer", RETURN_REPRESENTATION)
            .header(ACCEPT, SINGLE_OBJECT)
            .json(&row)
            .send()
            .await?;

        Self::single_row(response).await
    }

    #[instrument(skip(self, patch), fields(table = %table, id = %id))]
    async fn update(&self, table: Table, patch: Row, id: &RowId) -> Result<Row, StoreError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        tracing::debug!(columns = patch.len(), "Updating row");

        let response = self
            .client
            .patch(url)
            .header("prefer", RETURN_REPRESENTATION)
            .header(ACCEPT, SINGLE_OBJECT)
            .json(&patch)
            .send()
            .await?;

        Self::single_row(response).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let response = self.client.get(self.rest_base.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        Ok(())
    }
}

/// Error body returned by the REST API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    details: Option<String>,
}

/// Build an `Api` error, preferring the backend's own message.
fn api_error(status: StatusCode, body: &str) -> StoreError {
    let message = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => match err.details {
            Some(details) if !details.is_empty() => format!("{} ({details})", err.message),
            _ => err.message,
        },
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("store request failed")
            .to_string(),
        Err(_) => body.trim().to_string(),
    };

    tracing::debug!(status = status.as_u16(), %message, "Store rejected request");

    StoreError::Api {
        status: status.as_u16(),
        message,
    }
}

/// `{base}/rest/v1/` with exactly one trailing slash, so table names join as children.
fn rest_base(base: &Url) -> Result<Url, StoreError> {
    let root = format!("{}/rest/v1/", base.as_str().trim_end_matches('/'));
    Url::parse(&root).map_err(|e| StoreError::Config(format!("invalid store url: {e}")))
}
