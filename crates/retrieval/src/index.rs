//! In-memory similarity index over chunk embeddings.
//!
//! The index is an immutable snapshot: [`InMemoryIndex::build`] either
//! constructs the whole thing or fails, and the session installs a finished
//! index with a single assignment. A query therefore observes either the
//! fully old index or the fully new one, never a partial mix.
//!
//! Search is exact brute-force distance computation — sufficient at
//! single-document scale. The [`VectorIndex`] trait is the seam for swapping
//! in an approximate-nearest-neighbor backend without changing callers.

use crate::types::Chunk;
use paperchat_core::{AppError, AppResult, DistanceMetric};

/// Trait for similarity index backends.
pub trait VectorIndex: Send + Sync {
    /// Return the `k` chunks nearest to the query vector, nearest-first.
    ///
    /// Ties are broken by original chunk order (stable). `k` is clamped to
    /// the number of indexed chunks; searching an empty index returns an
    /// empty sequence, not an error. A query whose dimension differs from
    /// the indexed vectors is a `ConfigurationMismatch`.
    fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<(Chunk, f32)>>;

    /// Number of indexed chunks.
    fn len(&self) -> usize;

    /// Whether the index holds no chunks.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fixed distance metric this index was built with.
    fn metric(&self) -> DistanceMetric;

    /// Identity of the embedder whose vectors populate this index.
    fn embedder_id(&self) -> &str;
}

/// Brute-force in-memory index of (chunk, vector) pairs.
#[derive(Debug)]
pub struct InMemoryIndex {
    embedder_id: String,
    metric: DistanceMetric,
    entries: Vec<(Chunk, Vec<f32>)>,
    dimensions: usize,
}

impl InMemoryIndex {
    /// Build a complete index from parallel chunk and vector sequences.
    ///
    /// # Errors
    /// - `InvalidConfiguration` if the sequences differ in length
    /// - `ConfigurationMismatch` if the vectors do not all share one dimension
    pub fn build(
        embedder_id: impl Into<String>,
        metric: DistanceMetric,
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
    ) -> AppResult<Self> {
        if chunks.len() != vectors.len() {
            return Err(AppError::InvalidConfiguration(format!(
                "Chunk count ({}) does not match vector count ({})",
                chunks.len(),
                vectors.len()
            )));
        }

        let dimensions = vectors.first().map(|v| v.len()).unwrap_or(0);
        for (i, vector) in vectors.iter().enumerate() {
            if vector.len() != dimensions {
                return Err(AppError::ConfigurationMismatch(format!(
                    "Vector {} has dimension {}, expected {} — mixing embedding models?",
                    i,
                    vector.len(),
                    dimensions
                )));
            }
        }

        let embedder_id = embedder_id.into();

        tracing::debug!(
            "Built index: {} chunks, dimension {}, metric {:?}, embedder '{}'",
            chunks.len(),
            dimensions,
            metric,
            embedder_id
        );

        Ok(Self {
            embedder_id,
            metric,
            entries: chunks.into_iter().zip(vectors).collect(),
            dimensions,
        })
    }

    /// Build an index with no entries (an uploaded document with no chunks).
    pub fn empty(embedder_id: impl Into<String>, metric: DistanceMetric) -> Self {
        Self {
            embedder_id: embedder_id.into(),
            metric,
            entries: Vec::new(),
            dimensions: 0,
        }
    }
}

impl VectorIndex for InMemoryIndex {
    fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<(Chunk, f32)>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        if query.len() != self.dimensions {
            return Err(AppError::ConfigurationMismatch(format!(
                "Query vector has dimension {}, index holds dimension {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(Chunk, f32)> = self
            .entries
            .iter()
            .map(|(chunk, vector)| (chunk.clone(), distance(self.metric, query, vector)))
            .collect();

        // Stable sort: entries are in chunk order, so equal distances keep
        // original chunk order
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k.min(self.entries.len()));

        tracing::debug!("Retrieved {} chunks (requested top-{})", scored.len(), k);

        Ok(scored)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn metric(&self) -> DistanceMetric {
        self.metric
    }

    fn embedder_id(&self) -> &str {
        &self.embedder_id
    }
}

/// Distance under the given metric; smaller is nearer, identical vectors
/// are at distance zero under both metrics.
fn distance(metric: DistanceMetric, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        DistanceMetric::Cosine => 1.0 - cosine_similarity(a, b),
        DistanceMetric::L2 => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt(),
    }
}

/// Cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(position: u32, text: &str) -> Chunk {
        Chunk {
            position,
            start: 0,
            end: text.chars().count(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_identical_vector_is_top_result_with_zero_distance() {
        let index = InMemoryIndex::build(
            "mock/trigram-v1",
            DistanceMetric::Cosine,
            vec![chunk(0, "first"), chunk(1, "second"), chunk(2, "third")],
            vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
        )
        .unwrap();

        let results = index.search(&[0.0, 1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].0.text, "second");
        assert!(results[0].1.abs() < 1e-6);
    }

    #[test]
    fn test_k_clamped_to_index_size() {
        let index = InMemoryIndex::build(
            "mock/trigram-v1",
            DistanceMetric::Cosine,
            vec![chunk(0, "a"), chunk(1, "b")],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();

        let results = index.search(&[1.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = InMemoryIndex::empty("mock/trigram-v1", DistanceMetric::Cosine);
        let results = index.search(&[1.0, 0.0], 5).unwrap();
        assert!(results.is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_ties_broken_by_chunk_order() {
        // Two identical vectors: the earlier chunk must come first
        let index = InMemoryIndex::build(
            "mock/trigram-v1",
            DistanceMetric::Cosine,
            vec![chunk(0, "early"), chunk(1, "late")],
            vec![vec![1.0, 0.0], vec![1.0, 0.0]],
        )
        .unwrap();

        let results = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].0.text, "early");
        assert_eq!(results[1].0.text, "late");
    }

    #[test]
    fn test_mixed_dimensions_rejected() {
        let err = InMemoryIndex::build(
            "mock/trigram-v1",
            DistanceMetric::Cosine,
            vec![chunk(0, "a"), chunk(1, "b")],
            vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]],
        )
        .unwrap_err();

        assert!(matches!(err, AppError::ConfigurationMismatch(_)));
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let err = InMemoryIndex::build(
            "mock/trigram-v1",
            DistanceMetric::Cosine,
            vec![chunk(0, "a")],
            vec![],
        )
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_query_dimension_mismatch_rejected() {
        let index = InMemoryIndex::build(
            "mock/trigram-v1",
            DistanceMetric::Cosine,
            vec![chunk(0, "a")],
            vec![vec![1.0, 0.0, 0.0]],
        )
        .unwrap();

        let err = index.search(&[1.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationMismatch(_)));
    }

    #[test]
    fn test_l2_metric_orders_by_euclidean_distance() {
        let index = InMemoryIndex::build(
            "mock/trigram-v1",
            DistanceMetric::L2,
            vec![chunk(0, "near"), chunk(1, "far")],
            vec![vec![1.0, 1.0], vec![5.0, 5.0]],
        )
        .unwrap();

        let results = index.search(&[1.1, 1.0], 2).unwrap();
        assert_eq!(results[0].0.text, "near");
        assert_eq!(index.metric(), DistanceMetric::L2);
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
