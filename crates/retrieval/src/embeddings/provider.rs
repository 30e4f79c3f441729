//! Embedding provider trait and factory.

use paperchat_core::{AppError, AppResult, QaConfig};
use std::sync::Arc;

/// Trait for embedding providers.
///
/// All vectors produced by one provider instance share the same dimension.
/// The provider carries an identity (`embedder_id`) that indexes record at
/// build time and verify at query time — a mismatch is a
/// `ConfigurationMismatch`, never a silent garbage result.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "mock", "ollama", "gemini")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    ///
    /// Returns a same-length, same-order sequence of vectors. Unreachable
    /// services and malformed responses surface as `UpstreamUnavailable`.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::UpstreamUnavailable("No embedding returned".to_string()))
    }

    /// Identity string recorded by indexes built with this provider.
    fn embedder_id(&self) -> String {
        format!("{}/{}", self.provider_name(), self.model_name())
    }
}

/// Create an embedding provider based on configuration.
///
/// Unknown providers and missing API keys fail hard with
/// `InvalidConfiguration` — there is no silent fallback to another provider.
pub fn create_provider(
    config: &QaConfig,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match config.embedding_provider.as_str() {
        "mock" => Ok(Arc::new(super::providers::mock::MockProvider::new(384))),

        "ollama" => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            Ok(Arc::new(super::providers::ollama::OllamaProvider::new(
                base_url,
                &config.embedding_model,
            )))
        }

        "gemini" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::InvalidConfiguration(
                    "Gemini embedding provider requires an API key".to_string(),
                )
            })?;
            let mut provider = super::providers::gemini::GeminiEmbeddingProvider::new(
                api_key,
                &config.embedding_model,
            );
            if let Some(endpoint) = endpoint {
                provider = provider.with_base_url(endpoint);
            }
            Ok(Arc::new(provider))
        }

        other => Err(AppError::InvalidConfiguration(format!(
            "Unknown embedding provider: '{}'. Supported providers: mock, ollama, gemini",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mock_provider() {
        let config = QaConfig {
            embedding_provider: "mock".to_string(),
            ..Default::default()
        };

        let provider = create_provider(&config, None, None).unwrap();
        assert_eq!(provider.provider_name(), "mock");
        assert_eq!(provider.dimensions(), 384);
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = QaConfig {
            embedding_provider: "unknown".to_string(),
            ..Default::default()
        };

        let err = create_provider(&config, None, None).unwrap_err();
        assert!(err.to_string().contains("Unknown embedding provider"));
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let config = QaConfig::default();
        let err = create_provider(&config, None, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("API key"));
    }

    #[tokio::test]
    async fn test_provider_embed_single() {
        let config = QaConfig {
            embedding_provider: "mock".to_string(),
            ..Default::default()
        };
        let provider = create_provider(&config, None, None).unwrap();

        let embedding = provider.embed("test text").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }

    #[test]
    fn test_embedder_id_shape() {
        let provider = super::super::providers::mock::MockProvider::new(16);
        assert_eq!(provider.embedder_id(), "mock/trigram-v1");
    }
}
