//! Gemini LLM provider implementation.
//!
//! Integration with Google's Generative Language REST API
//! (`models/{model}:generateContent`). The API key is passed as the `key`
//! query parameter, matching the hosted service's convention.

use crate::client::{LlmClient, LlmRequest, LlmResponse};
use paperchat_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini generateContent request format.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini generateContent response format.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Gemini LLM client.
#[derive(Debug)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the API base URL (proxies, self-hosted gateways).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn to_gemini_request(&self, request: &LlmRequest) -> GeminiRequest {
        // Gemini has no separate system slot on this endpoint; prepend it
        // to the user text, matching the hosted chat variants.
        let text = match &request.system {
            Some(system) => format!("{}\n{}", system, request.prompt),
            None => request.prompt.clone(),
        };

        let generation_config =
            if request.temperature.is_some() || request.max_tokens.is_some() {
                Some(GenerationConfig {
                    temperature: request.temperature,
                    max_output_tokens: request.max_tokens,
                })
            } else {
                None
            };

        GeminiRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text }],
            }],
            generation_config,
        }
    }

    /// Model names may arrive with or without the "models/" prefix.
    fn model_path(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        }
    }

    /// Pull the generated text out of a response body.
    ///
    /// Safety-filter rejections and blocked prompts surface as a candidate
    /// with no text; those are `EmptyResponse`, not a success.
    fn extract_text(response: GeminiResponse) -> AppResult<String> {
        let content = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(AppError::EmptyResponse(
                "Gemini returned no text".to_string(),
            ));
        }

        Ok(content)
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Gemini");
        tracing::debug!("Model: {}", request.model);

        let url = format!(
            "{}/{}:generateContent",
            self.base_url,
            Self::model_path(&request.model)
        );
        let gemini_request = self.to_gemini_request(request);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamUnavailable(format!("Failed to send request to Gemini: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::UpstreamUnavailable(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("Failed to parse Gemini response: {}", e))
        })?;

        let content = Self::extract_text(gemini_response)?;
        tracing::info!("Received completion from Gemini");

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new("test-key");
        assert_eq!(client.provider_name(), "gemini");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_model_path_prefixing() {
        assert_eq!(GeminiClient::model_path("gemini-pro"), "models/gemini-pro");
        assert_eq!(
            GeminiClient::model_path("models/text-bison-001"),
            "models/text-bison-001"
        );
    }

    #[test]
    fn test_system_prompt_prepended() {
        let client = GeminiClient::new("test-key");
        let request = LlmRequest::new("What is Rust?", "gemini-pro").with_system("Be brief.");

        let gemini_req = client.to_gemini_request(&request);
        assert_eq!(gemini_req.contents.len(), 1);
        assert_eq!(gemini_req.contents[0].parts[0].text, "Be brief.\nWhat is Rust?");
    }

    #[test]
    fn test_generation_config_omitted_when_unset() {
        let client = GeminiClient::new("test-key");
        let request = LlmRequest::new("Hello", "gemini-pro");

        let gemini_req = client.to_gemini_request(&request);
        assert!(gemini_req.generation_config.is_none());
    }

    fn response_with_text(text: &str) -> GeminiResponse {
        GeminiResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![Part {
                        text: text.to_string(),
                    }],
                }),
            }],
        }
    }

    #[test]
    fn test_no_candidates_is_empty_response_error() {
        let err = GeminiClient::extract_text(GeminiResponse { candidates: vec![] }).unwrap_err();
        assert!(matches!(err, AppError::EmptyResponse(_)));
    }

    #[test]
    fn test_whitespace_candidate_is_empty_response_error() {
        let err = GeminiClient::extract_text(response_with_text("  \n ")).unwrap_err();
        assert!(matches!(err, AppError::EmptyResponse(_)));
    }

    #[test]
    fn test_candidate_text_passes_through() {
        let text = GeminiClient::extract_text(response_with_text("Grass is green.")).unwrap();
        assert_eq!(text, "Grass is green.");
    }
}
