//! Shared setup for router tests: in-memory store, mock providers.

#![allow(dead_code)]

pub mod upstream;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wine_service::config::KeepWarmConfig;
use wine_service::models::WineRecord;
use wine_service::services::providers::mock::MockChatProvider;
use wine_service::services::MemoryStore;
use wine_service::startup::{build_router, AppState};

pub const ORIGIN: &str = "http://localhost:3000";

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub openai: Arc<MockChatProvider>,
    pub deepseek: Arc<MockChatProvider>,
}

impl TestApp {
    pub async fn with_wines(wines: Vec<WineRecord>) -> Self {
        Self::build(
            wines,
            MockChatProvider::replying("openai", "Try the Barolo."),
            MockChatProvider::replying("deepseek", "Try the Sancerre."),
        )
        .await
    }

    pub async fn build(
        wines: Vec<WineRecord>,
        openai: MockChatProvider,
        deepseek: MockChatProvider,
    ) -> Self {
        let store = Arc::new(MemoryStore::with_wines(wines));
        let openai = Arc::new(openai);
        let deepseek = Arc::new(deepseek);

        let state = AppState::new(
            store.clone(),
            openai.clone(),
            deepseek.clone(),
            &KeepWarmConfig {
                url: None,
                interval_secs: 600,
                autostart: false,
            },
        );
        state.inventory.refresh().await.expect("initial refresh");

        Self {
            state,
            store,
            openai,
            deepseek,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), ORIGIN)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, None).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, value)
    }
}

pub fn wine(value: Value) -> WineRecord {
    value.as_object().cloned().expect("wine must be a JSON object")
}

pub fn red_and_white() -> Vec<WineRecord> {
    vec![
        wine(json!({ "name": "Barolo", "vintage": 2016, "country": "Italy", "color": "red" })),
        wine(json!({ "name": "Sancerre", "vintage": 2021, "country": "France", "color": "white" })),
    ]
}
