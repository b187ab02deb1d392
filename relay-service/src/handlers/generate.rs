//! Generation endpoint.

use crate::models::ResponseRecord;
use crate::services::RecordStore;
use crate::services::providers::{ProviderError, TextProvider};
use crate::startup::AppState;
use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use service_core::error::AppError;

/// Framing prepended to every prompt before it reaches the model.
pub const PROMPT_TEMPLATE: &str = "Please generate content based on the following input:";

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// POST /generate_response
///
/// Validates the prompt, generates text for it, appends the record to the
/// prompt log, and returns the record.
#[tracing::instrument(skip(state, body), fields(prompt_len))]
pub async fn generate_response(
    State(state): State<AppState>,
    body: Option<Json<GenerateRequest>>,
) -> Result<Json<ResponseRecord>, AppError> {
    let prompt = body
        .and_then(|Json(request)| request.prompt)
        .filter(|prompt| !prompt.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No input provided")))?;

    tracing::Span::current().record("prompt_len", prompt.len());

    let framed = format!("{}\n{}", PROMPT_TEMPLATE, prompt);

    let response = state.text_provider.generate(&framed).await.map_err(|e| {
        tracing::error!("Generation failed: {}", e);
        provider_error_to_app(e)
    })?;

    tracing::info!(model = %response.model, "Generated response");

    let record = ResponseRecord {
        prompt,
        text: response.text.trim().to_string(),
    };

    state.prompt_log.append(record.clone()).await?;

    Ok(Json(record))
}

/// Map provider failures onto the wire error taxonomy. Upstream API errors
/// surface as Gemini errors, everything else is an internal failure.
fn provider_error_to_app(err: ProviderError) -> AppError {
    match err {
        ProviderError::ApiError(_) | ProviderError::RateLimited(_) => {
            AppError::GeminiError(anyhow::Error::new(err))
        }
        ProviderError::NotConfigured(_)
        | ProviderError::NoModelAvailable(_)
        | ProviderError::NetworkError(_) => AppError::InternalError(anyhow::Error::new(err)),
    }
}
