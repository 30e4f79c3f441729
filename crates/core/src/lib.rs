//! Paperchat Core Library
//!
//! This crate provides the foundational utilities for paperchat:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management (pipeline and shell level)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, DistanceMetric, QaConfig};
pub use error::{AppError, AppResult};
