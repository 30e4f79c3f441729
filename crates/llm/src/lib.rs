//! LLM integration crate for paperchat.
//!
//! This crate provides a provider-agnostic abstraction for invoking
//! conversational models through a unified trait-based interface.
//!
//! # Providers
//! - **Gemini**: Google's hosted Generative Language API (default)
//! - **Ollama**: Local LLM runtime
//!
//! # Example
//! ```no_run
//! use paperchat_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse};
pub use factory::create_client;
pub use providers::{GeminiClient, OllamaClient};
