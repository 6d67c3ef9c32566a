//! Application startup and lifecycle management.

use crate::config::WineConfig;
use crate::handlers::{chat, feedback, health, keep_warm, wines};
use crate::services::providers::{deepseek::DeepSeekProvider, openai::OpenAiProvider};
use crate::services::{ChatProvider, InventoryCache, KeepWarm, SupabaseStore, WineStore};
use axum::http::{header, HeaderValue, Method, Request};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use service_core::error::AppError;
use service_core::middleware::security_headers::security_headers_middleware;
use service_core::middleware::tracing::{request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WineStore>,
    pub inventory: InventoryCache,
    pub openai: Arc<dyn ChatProvider>,
    pub deepseek: Arc<dyn ChatProvider>,
    pub keep_warm: Arc<KeepWarm>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn WineStore>,
        openai: Arc<dyn ChatProvider>,
        deepseek: Arc<dyn ChatProvider>,
        keep_warm: &crate::config::KeepWarmConfig,
    ) -> Self {
        let inventory = InventoryCache::new(store.clone());
        let keep_warm = Arc::new(KeepWarm::new(inventory.clone(), keep_warm));

        Self {
            store,
            inventory,
            openai,
            deepseek,
            keep_warm,
        }
    }
}

/// Build the HTTP router. CORS admits only `allowed_origin`, with credentials.
pub fn build_router(state: AppState, allowed_origin: &str) -> Router {
    let origin = allowed_origin.parse::<HeaderValue>().unwrap_or_else(|e| {
        tracing::error!(
            "Invalid CORS origin '{}': {}. Falling back to localhost.",
            allowed_origin,
            e
        );
        HeaderValue::from_static("http://localhost:3000")
    });

    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        .route("/wineList", get(wines::list_wines))
        .route("/add", post(wines::add_wine))
        .route("/feedback", post(feedback::add_feedback))
        .route("/openai", post(chat::openai_chat))
        .route("/deepseek", post(chat::deepseek_chat))
        .route("/recommend", post(chat::recommend))
        .route("/awake", post(keep_warm::awake))
        .route("/sleep", post(keep_warm::sleep))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .max_age(Duration::from_secs(60 * 60)),
        )
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
    allowed_origin: String,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Loads the inventory once before binding; a failed first load is logged
    /// and the service starts with an empty list.
    pub async fn build(config: WineConfig) -> Result<Self, AppError> {
        let store: Arc<dyn WineStore> = Arc::new(SupabaseStore::new(config.supabase.clone())?);

        let openai: Arc<dyn ChatProvider> = Arc::new(OpenAiProvider::new(config.openai.clone()));
        let deepseek: Arc<dyn ChatProvider> =
            Arc::new(DeepSeekProvider::new(config.deepseek.clone()));

        tracing::info!(
            openai_model = %config.openai.model,
            deepseek_model = %config.deepseek.model,
            "Initialized chat providers"
        );

        let state = AppState::new(store, openai, deepseek, &config.keep_warm);

        if let Err(e) = state.inventory.refresh().await {
            tracing::error!(error = %e, "Initial inventory load failed, starting empty");
        }

        if config.keep_warm.autostart {
            state.keep_warm.start();
        }

        // port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Wine service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
            allowed_origin: config.cors.allowed_origin,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until SIGINT/SIGTERM, then stop the keep-warm timer.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let keep_warm = self.state.keep_warm.clone();
        let router = build_router(self.state, &self.allowed_origin);

        let result = axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        keep_warm.stop();

        result.map_err(|e| {
            tracing::error!("HTTP server error: {}", e);
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
