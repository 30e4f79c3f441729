//! Configuration management for paperchat.
//!
//! Two layers live here:
//! - [`QaConfig`]: the explicit pipeline configuration passed to the QA engine
//!   at construction time (chunk sizing, top-k, models, distance metric).
//! - [`AppConfig`]: shell-level configuration merged from defaults, an
//!   optional YAML file, environment variables, and CLI flags — in that
//!   precedence order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Distance metric used by a similarity index.
///
/// The metric is fixed when an index is built and never mixed within one
/// index. Cosine is the default: identical vectors are at distance zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Cosine distance (1 - cosine similarity)
    Cosine,
    /// Euclidean (L2) distance
    L2,
}

impl Default for DistanceMetric {
    fn default() -> Self {
        DistanceMetric::Cosine
    }
}

/// Pipeline configuration for the QA engine.
///
/// Constructed explicitly by the hosting shell and handed to the engine —
/// there is no implicit environment lookup inside the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QaConfig {
    /// Embedding provider name ("mock", "ollama", "gemini")
    pub embedding_provider: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Generation provider name ("ollama", "gemini")
    pub generation_provider: String,

    /// Generation model identifier
    pub generation_model: String,

    /// Target chunk size in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,

    /// Number of chunks retrieved per query
    pub top_k: usize,

    /// Distance metric for similarity search
    #[serde(default)]
    pub metric: DistanceMetric,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            embedding_provider: "gemini".to_string(),
            embedding_model: "models/embedding-001".to_string(),
            generation_provider: "gemini".to_string(),
            generation_model: "gemini-pro".to_string(),
            chunk_size: 1000,
            chunk_overlap: 150,
            top_k: 4,
            metric: DistanceMetric::Cosine,
        }
    }
}

impl QaConfig {
    /// Validate the configuration.
    ///
    /// Rejects overlap >= chunk size, zero chunk size, and zero top-k.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 {
            return Err(AppError::InvalidConfiguration(
                "chunk_size must be greater than zero".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::InvalidConfiguration(
                "top_k must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Embedder identity string recorded by indexes and checked at query time.
    pub fn embedder_id(&self) -> String {
        format!("{}/{}", self.embedding_provider, self.embedding_model)
    }
}

/// Shell-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Pipeline configuration
    pub qa: QaConfig,

    /// API key for hosted providers
    pub api_key: Option<String>,

    /// Endpoint override (e.g., local Ollama URL)
    pub endpoint: Option<String>,

    /// Login credentials for the chat shell (username -> password).
    /// When empty, the login gate is skipped.
    pub credentials: HashMap<String, String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Configuration file structure (YAML).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    qa: Option<QaConfigFile>,
    credentials: Option<HashMap<String, String>>,
    logging: Option<LoggingConfig>,
}

/// Partial QaConfig as it appears in the config file; unset fields keep
/// their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct QaConfigFile {
    #[serde(rename = "embeddingProvider")]
    embedding_provider: Option<String>,
    #[serde(rename = "embeddingModel")]
    embedding_model: Option<String>,
    #[serde(rename = "generationProvider")]
    generation_provider: Option<String>,
    #[serde(rename = "generationModel")]
    generation_model: Option<String>,
    #[serde(rename = "chunkSize")]
    chunk_size: Option<usize>,
    #[serde(rename = "chunkOverlap")]
    chunk_overlap: Option<usize>,
    #[serde(rename = "topK")]
    top_k: Option<usize>,
    metric: Option<DistanceMetric>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            qa: QaConfig::default(),
            api_key: None,
            endpoint: None,
            credentials: HashMap::new(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `PAPERCHAT_CONFIG`: Path to config file
    /// - `PAPERCHAT_API_KEY` (or `GENAI_API_KEY`): API key for hosted providers
    /// - `PAPERCHAT_ENDPOINT`: Endpoint override
    /// - `PAPERCHAT_EMBEDDING_PROVIDER` / `PAPERCHAT_EMBEDDING_MODEL`
    /// - `PAPERCHAT_PROVIDER` / `PAPERCHAT_MODEL`: Generation provider/model
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("PAPERCHAT_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // YAML config file, if present
        if let Some(path) = config.config_file.clone() {
            if !path.exists() {
                return Err(AppError::InvalidConfiguration(format!(
                    "Config file does not exist: {:?}",
                    path
                )));
            }
            config = config.merge_yaml(&path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("PAPERCHAT_PROVIDER") {
            config.qa.generation_provider = provider;
        }
        if let Ok(model) = std::env::var("PAPERCHAT_MODEL") {
            config.qa.generation_model = model;
        }
        if let Ok(provider) = std::env::var("PAPERCHAT_EMBEDDING_PROVIDER") {
            config.qa.embedding_provider = provider;
        }
        if let Ok(model) = std::env::var("PAPERCHAT_EMBEDDING_MODEL") {
            config.qa.embedding_model = model;
        }
        if let Ok(endpoint) = std::env::var("PAPERCHAT_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        config.api_key = std::env::var("PAPERCHAT_API_KEY")
            .or_else(|_| std::env::var("GENAI_API_KEY"))
            .ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge settings from a YAML config file into this configuration.
    fn merge_yaml(mut self, path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: ConfigFile = serde_yaml::from_str(&content)?;

        if let Some(qa) = file.qa {
            if let Some(v) = qa.embedding_provider {
                self.qa.embedding_provider = v;
            }
            if let Some(v) = qa.embedding_model {
                self.qa.embedding_model = v;
            }
            if let Some(v) = qa.generation_provider {
                self.qa.generation_provider = v;
            }
            if let Some(v) = qa.generation_model {
                self.qa.generation_model = v;
            }
            if let Some(v) = qa.chunk_size {
                self.qa.chunk_size = v;
            }
            if let Some(v) = qa.chunk_overlap {
                self.qa.chunk_overlap = v;
            }
            if let Some(v) = qa.top_k {
                self.qa.top_k = v;
            }
            if let Some(v) = qa.metric {
                self.qa.metric = v;
            }
        }

        if let Some(credentials) = file.credentials {
            self.credentials = credentials;
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if logging.color == Some(false) {
                self.no_color = true;
            }
        }

        tracing::debug!("Merged config from {:?}", path);
        Ok(self)
    }

    /// Apply CLI flag overrides on top of the loaded configuration.
    ///
    /// A config file passed as a flag (rather than via `PAPERCHAT_CONFIG`)
    /// is merged here, since `load()` has not seen it.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> AppResult<Self> {
        if let Some(cf) = config_file {
            if self.config_file.as_ref() != Some(&cf) {
                self = self.merge_yaml(&cf)?;
            }
            self.config_file = Some(cf);
        }
        if let Some(p) = provider {
            self.qa.generation_provider = p;
        }
        if let Some(m) = model {
            self.qa.generation_model = m;
        }
        if let Some(l) = log_level {
            self.log_level = Some(l);
        }
        if verbose {
            self.verbose = true;
            self.log_level = Some("debug".to_string());
        }
        if no_color {
            self.no_color = true;
        }

        Ok(self)
    }
}
