//! One-shot question command.

use clap::Args;
use paperchat_core::{AppConfig, AppResult};
use paperchat_retrieval::{create_provider, ingest, QaEngine, Session};
use std::path::PathBuf;

/// Ask a single question, optionally grounded in a document.
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    question: String,

    /// Document to ground the answer in (PDF or plain text)
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let engine = build_engine(config)?;
        let mut session = Session::new();

        let grounded = if let Some(path) = &self.file {
            let document = ingest::read_file(path)?;
            let count = engine.build_index(&mut session, &document).await?;
            eprintln!("Indexed {} chunks from {}", count, document.source);
            true
        } else {
            false
        };

        let answer = engine.answer(&mut session, &self.question, grounded).await?;
        println!("{}", answer);

        Ok(())
    }
}

/// Assemble a QA engine from shell configuration.
pub(crate) fn build_engine(config: &AppConfig) -> AppResult<QaEngine> {
    let embedder = create_provider(
        &config.qa,
        config.endpoint.as_deref(),
        config.api_key.as_deref(),
    )?;

    let llm = paperchat_llm::create_client(
        &config.qa.generation_provider,
        config.endpoint.as_deref(),
        config.api_key.as_deref(),
    )?;

    QaEngine::new(config.qa.clone(), embedder, llm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperchat_core::QaConfig;

    #[test]
    fn test_build_engine_with_mock_embedder() {
        let config = AppConfig {
            qa: QaConfig {
                embedding_provider: "mock".to_string(),
                generation_provider: "ollama".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(build_engine(&config).is_ok());
    }

    #[test]
    fn test_build_engine_fails_without_gemini_key() {
        let config = AppConfig::default();
        assert!(build_engine(&config).is_err());
    }
}
