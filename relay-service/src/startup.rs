//! Application startup and lifecycle management.
//!
//! This module wires the text provider and prompt log into the HTTP server
//! and manages the server lifecycle.

use crate::config::RelayConfig;
use crate::handlers::{generate_response, health_check, readiness_check};
use crate::services::providers::{GeminiConfig, GeminiTextProvider, TextProvider};
use crate::services::{JsonFileStore, RecordStore};
use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use service_core::error::AppError;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub text_provider: Arc<dyn TextProvider>,
    pub prompt_log: Arc<dyn RecordStore>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let prompt_log = JsonFileStore::open(config.prompt_log.path.clone()).await?;
        tracing::info!(path = %config.prompt_log.path.display(), "Prompt log ready");

        let gemini_config = GeminiConfig {
            api_key: config.gemini.api_key.clone(),
            api_base_url: config.gemini.api_base_url.clone(),
            models: vec![
                config.gemini.primary_model.clone(),
                config.gemini.fallback_model.clone(),
            ],
        };
        let text_provider: Arc<dyn TextProvider> = Arc::new(GeminiTextProvider::new(gemini_config));
        tracing::info!(
            primary = %config.gemini.primary_model,
            fallback = %config.gemini.fallback_model,
            "Initialized Gemini text provider"
        );

        let state = AppState {
            text_provider,
            prompt_log: Arc::new(prompt_log),
        };

        // Bind listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Relay service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = Router::new()
            .route("/generate_response", post(generate_response))
            .route("/health", get(health_check))
            .route("/ready", get(readiness_check))
            .with_state(self.state)
            // Add tracing layer
            .layer(TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                },
            ))
            // Add tracing middleware for request_id
            .layer(from_fn(request_id_middleware))
            // Add CORS layer
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );

        axum::serve(self.listener, router).await
    }
}
