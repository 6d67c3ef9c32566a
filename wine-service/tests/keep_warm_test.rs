//! /awake and /sleep.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use std::time::Duration;

#[tokio::test]
async fn sleep_without_timer_succeeds() {
    let app = TestApp::with_wines(Vec::new()).await;

    let (status, body) = app.post_empty("/sleep").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], true);
    assert_eq!(body["running"], false);
}

#[tokio::test]
async fn awake_twice_keeps_one_timer() {
    let app = TestApp::with_wines(Vec::new()).await;

    let (status, first) = app.post_empty("/awake").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["result"], true);
    assert_eq!(first["running"], true);

    let (status, second) = app.post_empty("/awake").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["result"], true);
    assert_ne!(first["message"], second["message"]);

    assert!(app.state.keep_warm.is_running());
    app.post_empty("/sleep").await;
    assert!(!app.state.keep_warm.is_running());
}

#[tokio::test(start_paused = true)]
async fn awake_twice_refreshes_at_single_cadence() {
    let app = TestApp::with_wines(Vec::new()).await;
    let interval = app.state.keep_warm.interval();
    let baseline = app.store.list_calls();

    app.post_empty("/awake").await;
    app.post_empty("/awake").await;
    tokio::time::sleep(interval * 2 + Duration::from_millis(10)).await;

    assert_eq!(app.store.list_calls() - baseline, 2);

    app.post_empty("/sleep").await;
    tokio::time::sleep(interval * 2).await;
    assert_eq!(app.store.list_calls() - baseline, 2);
}
