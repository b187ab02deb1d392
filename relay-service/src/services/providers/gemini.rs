//! Gemini text provider.
//!
//! Model acquisition walks an ordered candidate list and settles on the
//! first model the API reports as available. Generation itself is a single
//! `generateContent` call against the resolved model.

use super::{ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for [`GeminiTextProvider`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub api_base_url: String,
    /// Candidate models, tried in order during acquisition.
    pub models: Vec<String>,
}

/// Text provider backed by the Gemini REST API.
pub struct GeminiTextProvider {
    client: Client,
    api_key: Secret<String>,
    api_base_url: String,
    models: Vec<String>,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: config.api_key,
            api_base_url: config.api_base_url,
            models: config.models,
        }
    }

    fn api_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.api_base_url,
            model,
            method,
            self.api_key.expose_secret()
        )
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}?key={}",
            self.api_base_url,
            model,
            self.api_key.expose_secret()
        )
    }

    /// Return the first candidate model the API reports as available.
    async fn resolve_model(&self) -> Result<String, ProviderError> {
        for model in &self.models {
            match self.check_model(model).await {
                Ok(()) => {
                    tracing::debug!(model = %model, "Resolved Gemini model");
                    return Ok(model.clone());
                }
                Err(e) => {
                    tracing::warn!(
                        model = %model,
                        error = %e,
                        "Model unavailable, trying next candidate"
                    );
                }
            }
        }

        Err(ProviderError::NoModelAvailable(self.models.join(", ")))
    }

    async fn check_model(&self, model: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .get(self.model_url(model))
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError(format!(
                "model lookup returned {}",
                status
            )))
        }
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(&self, input: &str) -> Result<ProviderResponse, ProviderError> {
        let model = self.resolve_model().await?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![ContentPart {
                    text: Some(input.to_string()),
                }],
            }],
        };

        tracing::debug!(
            model = %model,
            input_len = input.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url(&model, "generateContent"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited(error_text));
            }

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(ProviderResponse {
            text: extract_text(&body),
            model,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.resolve_model().await.map(|_| ())
    }
}

/// Pull the generated text out of a response body, preferring the first
/// candidate's first text part and falling back to the body itself.
fn extract_text(body: &str) -> String {
    let parsed: GenerateContentResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Gemini response was not valid JSON, using raw body");
            return body.to_string();
        }
    };

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}
