//! QA engine: the orchestration of chunk → embed → index and
//! embed → search → assemble → generate.
//!
//! The engine holds the pipeline configuration and the two external
//! collaborators (embedder, generator); all mutable state lives in the
//! [`Session`] passed to each operation. Failures surface to the caller as
//! displayable errors and never corrupt session state — a failed build
//! leaves the previous index in place, and a failed answer appends nothing
//! to the chat history.

use crate::chunker;
use crate::embeddings::EmbeddingProvider;
use crate::index::{InMemoryIndex, VectorIndex};
use crate::session::{Role, Session, SessionMode};
use crate::types::Document;
use paperchat_core::{AppError, AppResult, QaConfig};
use paperchat_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Document-grounded question answering engine.
pub struct QaEngine {
    config: QaConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmClient>,
}

impl QaEngine {
    /// Create an engine from validated configuration and collaborators.
    pub fn new(
        config: QaConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmClient>,
    ) -> AppResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            embedder,
            llm,
        })
    }

    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Chunk, embed and index a document, then install the index into the
    /// session.
    ///
    /// Replaces any existing index wholesale. Any failure before the final
    /// install leaves the session's prior mode untouched. Returns the number
    /// of indexed chunks.
    pub async fn build_index(&self, session: &mut Session, document: &Document) -> AppResult<usize> {
        tracing::info!(
            "Building index for '{}' ({} chars)",
            document.source,
            document.text.chars().count()
        );

        let chunks = chunker::chunk_text(
            &document.text,
            self.config.chunk_size,
            self.config.chunk_overlap,
        )?;

        let index = if chunks.is_empty() {
            InMemoryIndex::empty(self.embedder.embedder_id(), self.config.metric)
        } else {
            let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;

            if vectors.len() != texts.len() {
                return Err(AppError::UpstreamUnavailable(format!(
                    "Embedding service returned {} vectors for {} chunks",
                    vectors.len(),
                    texts.len()
                )));
            }

            InMemoryIndex::build(
                self.embedder.embedder_id(),
                self.config.metric,
                chunks,
                vectors,
            )?
        };

        let count = index.len();
        session.install_index(index);

        tracing::info!("Indexed {} chunks from '{}'", count, document.source);
        Ok(count)
    }

    /// Answer a question, grounded in the session's document when requested
    /// and available.
    ///
    /// Grounded mode embeds the question, retrieves the top-k chunks and
    /// stuffs them into the prompt; otherwise the raw question is sent. Both
    /// chat turns are appended only after the generator succeeds.
    pub async fn answer(
        &self,
        session: &mut Session,
        question: &str,
        use_index: bool,
    ) -> AppResult<String> {
        let prompt = match (use_index, session.mode()) {
            (true, SessionMode::DocumentIndexed(index)) => {
                if index.embedder_id() != self.embedder.embedder_id() {
                    return Err(AppError::ConfigurationMismatch(format!(
                        "Index was built with embedder '{}' but the engine uses '{}'",
                        index.embedder_id(),
                        self.embedder.embedder_id()
                    )));
                }

                let query_vector = self.embedder.embed(question).await?;
                let hits = index.search(&query_vector, self.config.top_k)?;

                tracing::debug!("Retrieved {} chunks for grounding", hits.len());

                let chunk_texts: Vec<String> =
                    hits.into_iter().map(|(chunk, _)| chunk.text).collect();
                paperchat_prompt::assemble_grounded(&chunk_texts, question)?
            }
            (true, SessionMode::NoDocument) | (false, _) => {
                paperchat_prompt::assemble_ungrounded(question)
            }
        };

        let request = LlmRequest::new(prompt, &self.config.generation_model).with_temperature(0.3);
        let response = self.llm.complete(&request).await?;

        session.push_turn(Role::User, question);
        session.push_turn(Role::Assistant, response.content.clone());

        Ok(response.content)
    }
}
