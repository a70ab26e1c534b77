//! Embedding generation for ticket fragments

use crate::{chunk::Fragment, Error, Result};
use serde::{Deserialize, Serialize};

/// A fragment paired with its embedding vector
///
/// Invariant: every vector produced within one run has the same dimension;
/// [`crate::index::VectorIndex::build`] rejects violations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedFragment {
    /// The source fragment
    pub fragment: Fragment,
    /// Fixed-dimension embedding vector
    pub vector: Vec<f32>,
}

impl EmbeddedFragment {
    /// Create a new embedded fragment
    #[must_use]
    pub fn new(fragment: Fragment, vector: Vec<f32>) -> Self {
        Self { fragment, vector }
    }

    /// Embedding dimension of this fragment
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Trait for embedding generation
///
/// The same embedder must be used to build the index and to embed queries
/// against it; mixing embedding models across build and query is a caller
/// error surfaced as a dimension mismatch at best.
pub trait Embedder: Send + Sync {
    /// Batch embed multiple texts, one vector per input, preserving order
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a query string
    fn embed_query(&self, query: &str) -> Result<Vec<f32>>;

    /// Embedding dimension
    fn dimension(&self) -> usize;

    /// Model identifier
    fn model_id(&self) -> &str;

    /// Embed fragments in order, pairing each with its vector
    fn embed_fragments(&self, fragments: Vec<Fragment>) -> Result<Vec<EmbeddedFragment>> {
        if fragments.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = fragments.iter().map(|f| f.content.as_str()).collect();
        let vectors = self.embed_batch(&texts)?;

        if vectors.len() != fragments.len() {
            return Err(Error::Embedding(format!(
                "embedder returned {} vectors for {} fragments",
                vectors.len(),
                fragments.len()
            )));
        }

        Ok(fragments
            .into_iter()
            .zip(vectors)
            .map(|(fragment, vector)| EmbeddedFragment::new(fragment, vector))
            .collect())
    }
}

/// Deterministic hash-based embedder for tests
///
/// Produces unit-length vectors derived from the input text, so identical
/// texts embed identically and similarity search behaves sensibly without
/// any external service.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
    model_id: String,
}

impl MockEmbedder {
    /// Create a new mock embedder with the given dimension
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            model_id: "mock-embedder".to_string(),
        }
    }

    /// Set the model ID
    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    fn hash_to_vector(&self, text: &str) -> Vec<f32> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut vector = Vec::with_capacity(self.dimension);
        let mut hasher = DefaultHasher::new();

        for component in 0..self.dimension {
            text.hash(&mut hasher);
            component.hash(&mut hasher);
            let hash = hasher.finish();
            let value = (hash as f32 / u64::MAX as f32) * 2.0 - 1.0;
            vector.push(value);
        }

        normalize(&mut vector);
        vector
    }
}

impl Embedder for MockEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                if text.is_empty() {
                    Err(Error::Embedding("empty text for embedding".to_string()))
                } else {
                    Ok(self.hash_to_vector(text))
                }
            })
            .collect()
    }

    fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        if query.is_empty() {
            return Err(Error::Embedding("empty query".to_string()));
        }
        Ok(self.hash_to_vector(query))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

/// Compute cosine similarity between two vectors
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============ MockEmbedder Tests ============

    #[test]
    fn test_mock_embedder_new() {
        let embedder = MockEmbedder::new(128);
        assert_eq!(embedder.dimension(), 128);
        assert_eq!(embedder.model_id(), "mock-embedder");
    }

    #[test]
    fn test_mock_embedder_with_model_id() {
        let embedder = MockEmbedder::new(64).with_model_id("custom");
        assert_eq!(embedder.model_id(), "custom");
    }

    #[test]
    fn test_mock_embedder_batch_counts_and_dimension() {
        let embedder = MockEmbedder::new(64);
        let vectors = embedder.embed_batch(&["one", "two", "three"]).unwrap();
        assert_eq!(vectors.len(), 3);
        for vector in &vectors {
            assert_eq!(vector.len(), 64);
        }
    }

    #[test]
    fn test_mock_embedder_normalized() {
        let embedder = MockEmbedder::new(128);
        let vector = embedder.embed_query("hello").unwrap();
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_mock_embedder_deterministic() {
        let embedder = MockEmbedder::new(128);
        let a = embedder.embed_query("hello").unwrap();
        let b = embedder.embed_query("hello").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mock_embedder_different_texts_differ() {
        let embedder = MockEmbedder::new(128);
        let a = embedder.embed_query("hello").unwrap();
        let b = embedder.embed_query("world").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_mock_embedder_rejects_empty_text() {
        let embedder = MockEmbedder::new(64);
        assert!(embedder.embed_query("").is_err());
        assert!(embedder.embed_batch(&["ok", ""]).is_err());
    }

    #[test]
    fn test_embed_fragments_pairs_in_order() {
        let embedder = MockEmbedder::new(32);
        let fragments = vec![
            Fragment::new("first".to_string(), 0, 5),
            Fragment::new("second".to_string(), 5, 11),
        ];
        let expected: Vec<_> = fragments.iter().map(|f| f.content.clone()).collect();

        let embedded = embedder.embed_fragments(fragments).unwrap();

        assert_eq!(embedded.len(), 2);
        for (pair, content) in embedded.iter().zip(expected) {
            assert_eq!(pair.fragment.content, content);
            assert_eq!(pair.dimension(), 32);
        }
    }

    #[test]
    fn test_embed_fragments_empty_skips_service() {
        let embedder = MockEmbedder::new(32);
        let embedded = embedder.embed_fragments(Vec::new()).unwrap();
        assert!(embedded.is_empty());
    }

    // ============ Similarity Tests ============

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_similarity_different_lengths() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < f32::EPSILON);
    }

    // ============ Property-Based Tests ============

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_mock_embedder_dimension(dim in 1usize..512) {
            let embedder = MockEmbedder::new(dim);
            let vector = embedder.embed_query("test").unwrap();
            prop_assert_eq!(vector.len(), dim);
        }

        #[test]
        fn prop_mock_embedder_unit_norm(text in "[a-zA-Z ]{1,100}") {
            let embedder = MockEmbedder::new(128);
            let vector = embedder.embed_query(&text).unwrap();
            let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
            prop_assert!((norm - 1.0).abs() < 1e-4);
        }

        #[test]
        fn prop_batch_count_matches_input(n in 1usize..20) {
            let embedder = MockEmbedder::new(16);
            let texts: Vec<String> = (0..n).map(|i| format!("text {i}")).collect();
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let vectors = embedder.embed_batch(&refs).unwrap();
            prop_assert_eq!(vectors.len(), n);
        }

        #[test]
        fn prop_cosine_similarity_range(
            a in prop::collection::vec(-1.0f32..1.0, 10),
            b in prop::collection::vec(-1.0f32..1.0, 10)
        ) {
            let sim = cosine_similarity(&a, &b);
            prop_assert!(sim >= -1.0 - 1e-5);
            prop_assert!(sim <= 1.0 + 1e-5);
        }
    }
}
