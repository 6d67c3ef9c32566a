//! A loopback HTTP server standing in for Supabase, the chat providers and the
//! keep-warm target. It records every request and answers with one canned
//! reply, or never answers at all.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// One request as the fake saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Seen {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
pub struct FakeUpstream {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
    /// `None` leaves every request hanging.
    reply: Arc<Option<(StatusCode, Value)>>,
}

impl FakeUpstream {
    pub async fn replying(status: StatusCode, body: Value) -> Self {
        Self::spawn(Some((status, body))).await
    }

    pub async fn silent() -> Self {
        Self::spawn(None).await
    }

    async fn spawn(reply: Option<(StatusCode, Value)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        let upstream = Self {
            base_url: format!("http://{}", addr),
            seen: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(reply),
        };

        let router = Router::new()
            .fallback(record)
            .with_state(upstream.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        upstream
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Seen {
        self.requests().pop().expect("no request reached the fake upstream")
    }
}

async fn record(
    State(upstream): State<FakeUpstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    upstream.seen.lock().unwrap().push(Seen {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    match upstream.reply.as_ref() {
        Some((status, body)) => (*status, Json(body.clone())).into_response(),
        None => std::future::pending().await,
    }
}
