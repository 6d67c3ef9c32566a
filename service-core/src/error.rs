use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A downstream dependency (database, LLM provider) failed. `error` is the
    /// raw payload reported by that dependency and is returned to the caller
    /// unchanged.
    #[error("{message}: {error}")]
    Upstream { message: String, error: Value },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn upstream(message: impl Into<String>, error: Value) -> Self {
        AppError::Upstream {
            message: message.into(),
            error,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
            error: Value,
        }

        let (status, message, error) = match self {
            AppError::Upstream { message, error } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, error)
            }
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Value::String(format!("{:#}", err)),
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Value::String(err.to_string()),
            ),
        };

        (status, Json(ErrorResponse { message, error })).into_response()
    }
}
