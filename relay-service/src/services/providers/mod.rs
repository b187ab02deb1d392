//! Text generation providers.

pub mod gemini;
pub mod mock;

pub use gemini::{GeminiConfig, GeminiTextProvider};
pub use mock::MockTextProvider;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("No usable model among candidates: {0}")]
    NoModelAvailable(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Successful provider output.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Generated text, exactly as the provider returned it.
    pub text: String,
    /// Model that produced the text.
    pub model: String,
}

/// Trait for text generation backends.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate text for the given input.
    async fn generate(&self, input: &str) -> Result<ProviderResponse, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
