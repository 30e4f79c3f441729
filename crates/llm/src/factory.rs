//! LLM provider factory.
//!
//! Resolves a provider name to a concrete client. Unknown providers and
//! missing API keys fail hard — there is no silent fallback to a different
//! provider.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, OllamaClient};
use paperchat_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "gemini")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (required for hosted providers)
///
/// # Errors
/// `InvalidConfiguration` if the provider is unknown or a required API key
/// is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        "gemini" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::InvalidConfiguration("Gemini provider requires an API key".to_string())
            })?;
            let mut client = GeminiClient::new(api_key);
            if let Some(endpoint) = endpoint {
                client = client.with_base_url(endpoint);
            }
            Ok(Arc::new(client))
        }
        _ => Err(AppError::InvalidConfiguration(format!(
            "Unknown generation provider: '{}'. Supported providers: ollama, gemini",
            provider
        ))),
    }
}
