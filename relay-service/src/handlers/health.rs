//! Health and readiness endpoints.

use crate::services::RecordStore;
use crate::services::providers::TextProvider;
use crate::startup::AppState;
use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};
use service_core::error::AppError;

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "relay-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /ready
///
/// Verifies the prompt log and the text provider before reporting ready.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.prompt_log.health_check().await?;
    state.text_provider.health_check().await.map_err(|e| {
        tracing::error!("Provider readiness check failed: {}", e);
        AppError::InternalError(anyhow::Error::new(e))
    })?;

    Ok(Json(json!({
        "status": "ready",
        "service": "relay-service",
        "version": env!("CARGO_PKG_VERSION")
    })))
}
