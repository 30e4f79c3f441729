//! Gemini embedding provider.
//!
//! Embeddings via Google's Generative Language REST API
//! (`models/{model}:batchEmbedContents`), the hosted service behind the
//! `models/embedding-001` family.

use crate::embeddings::provider::EmbeddingProvider;
use paperchat_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    model: String,
    content: Content,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

/// Gemini embedding provider.
#[derive(Debug)]
pub struct GeminiEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiEmbeddingProvider {
    /// Create a new Gemini embedding provider.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
        }
    }

    /// Override the API base URL (proxies, self-hosted gateways).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn model_path(&self) -> String {
        if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        // embedding-001 output size; the index checks actual vector
        // dimensions at build time
        768
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model_path = self.model_path();
        let url = format!("{}/{}:batchEmbedContents", self.base_url, model_path);

        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: model_path.clone(),
                    content: Content {
                        parts: vec![Part { text: text.clone() }],
                    },
                })
                .collect(),
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!(
                    "Failed to reach Gemini embeddings API: {}",
                    e
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::UpstreamUnavailable(format!(
                "Gemini embeddings API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: BatchEmbedResponse = response.json().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Malformed Gemini embedding response: {}", e))
        })?;

        if parsed.embeddings.len() != texts.len() {
            return Err(AppError::UpstreamUnavailable(format!(
                "Gemini returned {} embeddings for {} inputs",
                parsed.embeddings.len(),
                texts.len()
            )));
        }

        tracing::debug!(
            "Embedded {} texts with Gemini model '{}'",
            texts.len(),
            self.model
        );

        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_identity() {
        let provider = GeminiEmbeddingProvider::new("key", "models/embedding-001");
        assert_eq!(provider.provider_name(), "gemini");
        assert_eq!(provider.model_name(), "models/embedding-001");
        assert_eq!(provider.embedder_id(), "gemini/models/embedding-001");
    }

    #[test]
    fn test_model_path_prefixing() {
        let provider = GeminiEmbeddingProvider::new("key", "embedding-001");
        assert_eq!(provider.model_path(), "models/embedding-001");

        let provider = GeminiEmbeddingProvider::new("key", "models/embedding-001");
        assert_eq!(provider.model_path(), "models/embedding-001");
    }

    #[tokio::test]
    async fn test_empty_batch_short_circuits() {
        // No network call happens for an empty input batch
        let provider = GeminiEmbeddingProvider::new("key", "embedding-001")
            .with_base_url("http://127.0.0.1:1");
        let result = provider.embed_batch(&[]).await.unwrap();
        assert!(result.is_empty());
    }
}
