//! Persistence for wines and feedback.
//!
//! Records live in a hosted PostgREST database (Supabase). The service only
//! lists and inserts; all schema and referential checks happen on that side.

use crate::config::SupabaseConfig;
use crate::models::{FeedbackRecord, Record, WineRecord};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use service_core::error::AppError;
use service_core::observability::TracedClientExt;
use thiserror::Error;

/// Error type for store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    /// The database answered with a non-2xx status. `body` is its error
    /// object (`code`, `message`, `details`, `hint`) when it sent JSON.
    #[error("Store rejected request ({status}): {body}")]
    Rejected { status: u16, body: Value },

    #[error("Unexpected store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// The raw error object returned to HTTP callers.
    pub fn payload(&self) -> Value {
        match self {
            StoreError::Rejected { body, .. } => body.clone(),
            StoreError::Network(msg) => json!({ "kind": "network", "message": msg }),
            StoreError::Decode(msg) => json!({ "kind": "decode", "message": msg }),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::upstream("Save failed", err.payload())
    }
}

/// Tables the relay reads and writes.
#[async_trait]
pub trait WineStore: Send + Sync {
    /// All wine rows, in the order the store returns them.
    async fn list_wines(&self) -> Result<Vec<WineRecord>, StoreError>;

    /// Insert one wine and return the stored row(s), server fields included.
    async fn insert_wine(&self, wine: WineRecord) -> Result<Vec<WineRecord>, StoreError>;

    /// Insert one feedback entry and return the stored row(s).
    async fn insert_feedback(
        &self,
        feedback: FeedbackRecord,
    ) -> Result<Vec<FeedbackRecord>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// PostgREST client for a Supabase project.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    config: SupabaseConfig,
}

impl SupabaseStore {
    pub fn new(config: SupabaseConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

        tracing::info!(url = %config.url, "Configured Supabase store");
        Ok(Self { client, config })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url.trim_end_matches('/'), table)
    }

    async fn select(&self, table: &str, limit: Option<usize>) -> Result<Vec<Record>, StoreError> {
        let mut url = format!("{}?select=*", self.table_url(table));
        if let Some(limit) = limit {
            url.push_str(&format!("&limit={}", limit));
        }

        let response = self
            .client
            .traced_get(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        read_rows(response).await
    }

    async fn insert(&self, table: &str, record: Record) -> Result<Vec<Record>, StoreError> {
        let url = self.table_url(table);

        tracing::debug!(table = %table, "Inserting record");

        let response = self
            .client
            .traced_post(&url)
            .header("apikey", &self.config.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(&self.config.anon_key)
            .json(&[record])
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        read_rows(response).await
    }
}

async fn read_rows(response: reqwest::Response) -> Result<Vec<Record>, StoreError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| StoreError::Network(e.to_string()))?;

    if !status.is_success() {
        return Err(rejection(status, &bytes));
    }

    serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

fn rejection(status: StatusCode, bytes: &[u8]) -> StoreError {
    let body = serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()));

    StoreError::Rejected {
        status: status.as_u16(),
        body,
    }
}

#[async_trait]
impl WineStore for SupabaseStore {
    async fn list_wines(&self) -> Result<Vec<WineRecord>, StoreError> {
        self.select(&self.config.wine_table, None).await
    }

    async fn insert_wine(&self, wine: WineRecord) -> Result<Vec<WineRecord>, StoreError> {
        self.insert(&self.config.wine_table, wine).await
    }

    async fn insert_feedback(
        &self,
        feedback: FeedbackRecord,
    ) -> Result<Vec<FeedbackRecord>, StoreError> {
        self.insert(&self.config.feedback_table, feedback).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.select(&self.config.wine_table, Some(1)).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(url: &str) -> SupabaseStore {
        SupabaseStore::new(SupabaseConfig {
            url: url.to_string(),
            anon_key: "anon".to_string(),
            wine_table: "wine".to_string(),
            feedback_table: "wine_feedback".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn table_url_tolerates_trailing_slash() {
        assert_eq!(
            store("https://abc.supabase.co/").table_url("wine"),
            "https://abc.supabase.co/rest/v1/wine"
        );
        assert_eq!(
            store("https://abc.supabase.co").table_url("wine_feedback"),
            "https://abc.supabase.co/rest/v1/wine_feedback"
        );
    }

    #[test]
    fn rejection_keeps_json_error_object() {
        let body = br#"{"code":"23502","message":"null value in column \"name\""}"#;
        let err = rejection(StatusCode::BAD_REQUEST, body);

        assert!(matches!(err, StoreError::Rejected { status: 400, .. }));
        assert_eq!(err.payload()["code"], "23502");
    }

    #[test]
    fn rejection_wraps_plain_text() {
        let err = rejection(StatusCode::BAD_GATEWAY, b"upstream down");
        assert_eq!(err.payload(), Value::String("upstream down".to_string()));
    }

    #[test]
    fn store_error_becomes_save_failed() {
        let err: AppError = StoreError::Network("connection refused".to_string()).into();
        match err {
            AppError::Upstream { message, error } => {
                assert_eq!(message, "Save failed");
                assert_eq!(error["kind"], "network");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
