use axum::{extract::State, Json};
use serde::Serialize;

use crate::startup::AppState;

#[derive(Debug, Serialize)]
pub struct KeepWarmResponse {
    pub result: bool,
    pub message: String,
    pub running: bool,
}

/// Start the keep-warm timer; succeeds whether or not it was already running.
pub async fn awake(State(state): State<AppState>) -> Json<KeepWarmResponse> {
    let message = if state.keep_warm.start() {
        "Keep-warm timer started"
    } else {
        "Keep-warm timer already running"
    };

    Json(KeepWarmResponse {
        result: true,
        message: message.to_string(),
        running: state.keep_warm.is_running(),
    })
}

/// Stop the keep-warm timer; succeeds whether or not it was running.
pub async fn sleep(State(state): State<AppState>) -> Json<KeepWarmResponse> {
    let message = if state.keep_warm.stop() {
        "Keep-warm timer stopped"
    } else {
        "Keep-warm timer was not running"
    };

    Json(KeepWarmResponse {
        result: true,
        message: message.to_string(),
        running: state.keep_warm.is_running(),
    })
}
