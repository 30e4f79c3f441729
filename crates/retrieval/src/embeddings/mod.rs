//! Embedding generation for document chunks and queries.
//!
//! Provider-agnostic: the pipeline talks to the [`EmbeddingProvider`] trait
//! and the factory resolves a concrete provider from configuration.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
