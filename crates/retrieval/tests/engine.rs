//! End-to-end pipeline tests with deterministic collaborators.

use paperchat_core::{AppError, AppResult, DistanceMetric, QaConfig};
use paperchat_llm::{LlmClient, LlmRequest, LlmResponse};
use paperchat_retrieval::embeddings::providers::mock::MockProvider;
use paperchat_retrieval::{Document, EmbeddingProvider, QaEngine, Session};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Generator stub that echoes the prompt back.
#[derive(Debug)]
struct EchoLlm;

#[async_trait::async_trait]
impl LlmClient for EchoLlm {
    fn provider_name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        Ok(LlmResponse {
            content: request.prompt.clone(),
            model: request.model.clone(),
        })
    }
}

/// Embedding stub that fails with a network error on its second call.
#[derive(Debug)]
struct FlakyEmbedder {
    inner: MockProvider,
    calls: AtomicUsize,
}

impl FlakyEmbedder {
    fn new() -> Self {
        Self {
            inner: MockProvider::new(384),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        384
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= 1 {
            return Err(AppError::UpstreamUnavailable(
                "connection reset by peer".to_string(),
            ));
        }
        self.inner.embed_batch(texts).await
    }
}

fn test_config() -> QaConfig {
    QaConfig {
        embedding_provider: "mock".to_string(),
        embedding_model: "trigram-v1".to_string(),
        generation_provider: "echo".to_string(),
        generation_model: "echo-v1".to_string(),
        chunk_size: 20,
        chunk_overlap: 5,
        top_k: 1,
        metric: DistanceMetric::Cosine,
    }
}

fn engine() -> QaEngine {
    QaEngine::new(test_config(), Arc::new(MockProvider::new(384)), Arc::new(EchoLlm)).unwrap()
}

// Scenario 1: a small two-sentence document, chunked at S=20/O=5, where a
// lexically overlapping question retrieves the right chunk as top match.
#[tokio::test]
async fn grounded_question_retrieves_matching_chunk() {
    let engine = engine();
    let mut session = Session::new();
    let document = Document::new("doc.txt", "The sky is blue. Grass is green.");

    let count = engine.build_index(&mut session, &document).await.unwrap();
    assert!(count >= 2, "S=20/O=5 must produce at least two chunks");

    let answer = engine
        .answer(&mut session, "What color is grass?", true)
        .await
        .unwrap();

    // top_k = 1: the single retrieved chunk must be the grass one
    assert!(
        answer.contains("rass is green"),
        "expected the grass chunk in the prompt, got: {}",
        answer
    );
    assert!(!answer.contains("sky is blue"));
}

// Scenario 2: no document indexed, ungrounded mode sends the raw question.
#[tokio::test]
async fn ungrounded_question_is_sent_raw() {
    let engine = engine();
    let mut session = Session::new();

    let answer = engine.answer(&mut session, "Hello", false).await.unwrap();
    assert_eq!(answer, "Hello");
}

// Scenario 3: an embedding failure during build surfaces as
// UpstreamUnavailable and leaves the session's (absent) index untouched.
#[tokio::test]
async fn failed_build_leaves_session_state_intact() {
    let flaky = Arc::new(FlakyEmbedder::new());
    let engine = QaEngine::new(test_config(), flaky.clone(), Arc::new(EchoLlm)).unwrap();
    let mut session = Session::new();

    // First call consumes the embedder's single good response
    let warmup = flaky.embed_batch(&["warmup".to_string()]).await;
    assert!(warmup.is_ok());

    let document = Document::new("doc.txt", "The sky is blue. Grass is green.");
    let err = engine.build_index(&mut session, &document).await.unwrap_err();

    assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    assert!(!session.has_document(), "failed build must not install an index");

    // The session stays usable: an ungrounded question still works
    let answer = engine.answer(&mut session, "still alive?", false).await.unwrap();
    assert_eq!(answer, "still alive?");
}

// Re-uploading a document replaces the index wholesale.
#[tokio::test]
async fn second_upload_replaces_index() {
    let engine = engine();
    let mut session = Session::new();

    let first = Document::new("a.txt", "Only about oceans and water everywhere.");
    engine.build_index(&mut session, &first).await.unwrap();

    let second = Document::new("b.txt", "Only about mountains and snow everywhere.");
    engine.build_index(&mut session, &second).await.unwrap();

    let answer = engine
        .answer(&mut session, "Tell me about mountains", true)
        .await
        .unwrap();
    assert!(answer.contains("mountains"));
    assert!(!answer.contains("oceans"));
}

// A full conversation accumulates history in order; logout clears it.
#[tokio::test]
async fn history_accumulates_and_logout_clears() {
    let engine = engine();
    let mut session = Session::new();

    engine.answer(&mut session, "one", false).await.unwrap();
    engine.answer(&mut session, "two", false).await.unwrap();
    assert_eq!(session.history().len(), 4);

    session.logout();
    assert!(session.history().is_empty());
    assert!(!session.has_document());
}
