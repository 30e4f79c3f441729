//! Error types for paperchat.
//!
//! This module defines a unified error enum covering every failure category
//! in the pipeline: configuration, document extraction, upstream services,
//! embedder identity mismatches, and empty generations.

use thiserror::Error;

/// Unified error type for paperchat.
///
/// All fallible functions return `Result<T, AppError>`. We never panic —
/// errors must be represented and propagated. Every variant renders to a
/// message suitable for direct display to the user; none are retried or
/// recovered internally, and none are fatal to the session.
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad chunk/overlap sizing, unknown provider, missing API key, or any
    /// other construction-time configuration problem
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The uploaded document could not be read or yielded no text
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// The embedding or generation service is unreachable, rejected the
    /// request, or returned a malformed response
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Embedder identity differs between index-build time and query time,
    /// or vector dimensions do not line up
    #[error("Configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    /// The generation service returned no usable text
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
