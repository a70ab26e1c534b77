//! In-memory vector index over embedded fragments

use crate::{
    chunk::Fragment,
    embed::{cosine_similarity, EmbeddedFragment},
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// A fragment with its similarity score for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredFragment {
    /// The retrieved fragment
    pub fragment: Fragment,
    /// Cosine similarity against the query vector
    pub score: f32,
}

/// Nearest-neighbor index built once per run and queried read-only
///
/// Entries are held in insertion order; ranking ties are broken by that
/// order, which keeps query results fully deterministic.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Vec<EmbeddedFragment>,
    dimension: Option<usize>,
}

impl VectorIndex {
    /// Build an index from embedded fragments in a single pass
    ///
    /// All vectors must share one dimension; an empty input produces an
    /// empty (degenerate) index.
    pub fn build(embedded: Vec<EmbeddedFragment>) -> Result<Self> {
        let dimension = embedded.first().map(EmbeddedFragment::dimension);

        if let Some(expected) = dimension {
            if expected == 0 {
                return Err(Error::InvalidConfig(
                    "embedding dimension must be greater than zero".to_string(),
                ));
            }
            for entry in &embedded {
                if entry.dimension() != expected {
                    return Err(Error::DimensionMismatch {
                        expected,
                        actual: entry.dimension(),
                    });
                }
            }
        }

        Ok(Self {
            entries: embedded,
            dimension,
        })
    }

    /// Number of indexed fragments
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension, if any fragment is stored
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Rank stored fragments by cosine similarity against `query_vector`
    ///
    /// Returns up to `k` fragments best-to-worst; if `k` exceeds the stored
    /// count, all fragments are returned. Ties keep insertion order.
    pub fn query(&self, query_vector: &[f32], k: usize) -> Result<Vec<ScoredFragment>> {
        if k == 0 {
            return Err(Error::InvalidConfig(
                "k must be greater than zero".to_string(),
            ));
        }

        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let expected = self.dimension.unwrap_or_default();
        if query_vector.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: query_vector.len(),
            });
        }

        let mut scored: Vec<ScoredFragment> = self
            .entries
            .iter()
            .map(|entry| ScoredFragment {
                fragment: entry.fragment.clone(),
                score: cosine_similarity(query_vector, &entry.vector),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}
