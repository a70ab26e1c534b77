//! Similarity retrieval over the per-run vector index

use crate::{
    embed::Embedder,
    index::{ScoredFragment, VectorIndex},
    Result,
};

/// Retrieves the top-k fragments for a query
///
/// Borrows the index and the embedder that built it; embedding-space
/// consistency between build and query is the caller's invariant.
pub struct Retriever<'a, E: Embedder> {
    index: &'a VectorIndex,
    embedder: &'a E,
}

impl<'a, E: Embedder> Retriever<'a, E> {
    /// Create a retriever over an index and its embedder
    #[must_use]
    pub fn new(index: &'a VectorIndex, embedder: &'a E) -> Self {
        Self { index, embedder }
    }

    /// Retrieve up to `k` fragments most similar to `query_text`
    ///
    /// An empty index short-circuits to an empty result without calling the
    /// embedding service.
    pub fn retrieve(&self, query_text: &str, k: usize) -> Result<Vec<ScoredFragment>> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed_query(query_text)?;
        self.index.query(&query_vector, k)
    }
}
