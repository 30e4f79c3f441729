//! Core data types for the retrieval pipeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded document: raw extracted text plus a source identifier.
///
/// Created on upload, immutable, and discarded when the session ends.
/// Never persisted to durable storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique id for this upload
    pub id: Uuid,

    /// Source identifier (usually the filename)
    pub source: String,

    /// Full extracted text
    pub text: String,
}

impl Document {
    /// Create a document from extracted text and its source name.
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            text: text.into(),
        }
    }
}

/// A contiguous substring of a document, the unit of retrieval.
///
/// Chunk order matches document order; `position` is the ordinal within the
/// source document and is used for stable tie-breaking during search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Ordinal position within the document (0-based)
    pub position: u32,

    /// Char offset of the chunk start within the document text
    pub start: usize,

    /// Char offset one past the chunk end
    pub end: usize,

    /// The chunk text
    pub text: String,
}
