//! Mock text provider for tests and local development.

use super::{ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;

/// Provider that answers without calling any external API.
pub struct MockTextProvider {
    enabled: bool,
    canned_response: Option<String>,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            canned_response: None,
        }
    }

    /// Always answer with the given text instead of echoing the input.
    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            enabled: true,
            canned_response: Some(text.into()),
        }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, input: &str) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock provider is disabled".to_string(),
            ));
        }

        let text = match &self.canned_response {
            Some(text) => text.clone(),
            None => format!("Mock response for: {}", input),
        };

        Ok(ProviderResponse {
            text,
            model: "mock".to_string(),
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock provider is disabled".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_the_input_by_default() {
        let provider = MockTextProvider::new(true);

        let response = provider.generate("ping").await.expect("generate failed");

        assert_eq!(response.text, "Mock response for: ping");
        assert_eq!(response.model, "mock");
    }

    #[tokio::test]
    async fn returns_the_canned_response_when_set() {
        let provider = MockTextProvider::with_response("always this");

        let response = provider.generate("anything").await.expect("generate failed");

        assert_eq!(response.text, "always this");
    }

    #[tokio::test]
    async fn disabled_mock_reports_unconfigured() {
        let provider = MockTextProvider::new(false);

        let err = provider.generate("ping").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert!(provider.health_check().await.is_err());
    }
}
