//! Retrieval pipeline for paperchat: document-grounded question answering.
//!
//! The pipeline is a single forward flow, once per user query:
//!
//! - Build phase (on upload): [`ingest`] → [`chunker`] → [`embeddings`] →
//!   [`index`]
//! - Query phase (per question): embed → [`index`] search → prompt assembly →
//!   generation
//!
//! All mutable state lives in a [`session::Session`] owned by the hosting
//! shell; nothing is persisted and nothing is shared across sessions. The
//! [`engine::QaEngine`] composes the pieces.

pub mod chunker;
pub mod embeddings;
pub mod engine;
pub mod index;
pub mod ingest;
pub mod session;
pub mod types;

// Re-export the main surface
pub use embeddings::{create_provider, EmbeddingProvider};
pub use engine::QaEngine;
pub use index::{InMemoryIndex, VectorIndex};
pub use session::{ChatTurn, Role, Session, SessionMode};
pub use types::{Chunk, Document};
