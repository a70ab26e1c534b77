//! Ticket-text chunking into overlapping fragments

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Unique fragment identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FragmentId(pub uuid::Uuid);

impl FragmentId {
    /// Create a new random fragment ID
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for FragmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FragmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered substring of the ticket text
///
/// Fragments preserve source order; `start_offset`/`end_offset` are char
/// positions into the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Unique fragment identifier
    pub id: FragmentId,
    /// Fragment text content
    pub content: String,
    /// Char offset in the source text (start, inclusive)
    pub start_offset: usize,
    /// Char offset in the source text (end, exclusive)
    pub end_offset: usize,
}

impl Fragment {
    /// Create a new fragment
    #[must_use]
    pub fn new(content: String, start_offset: usize, end_offset: usize) -> Self {
        Self {
            id: FragmentId::new(),
            content,
            start_offset,
            end_offset,
        }
    }

    /// Fragment length in chars
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    /// Check if the fragment is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Sliding-window chunker with fixed size and overlap
///
/// A window of `size` chars advances by `size - overlap` chars per step; the
/// final fragment may be shorter. Chunking is deterministic and total for any
/// input, and an empty input yields an empty sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlidingChunker {
    size: usize,
    overlap: usize,
}

impl SlidingChunker {
    /// Create a new chunker, validating `size > 0` and `overlap < size`
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap >= size {
            return Err(Error::InvalidConfig(format!(
                "chunk overlap {overlap} must be smaller than chunk size {size}"
            )));
        }
        Ok(Self { size, overlap })
    }

    /// Configured window size in chars
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Configured overlap between consecutive fragments in chars
    #[must_use]
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into ordered overlapping fragments
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<Fragment> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let step = self.size - self.overlap;
        let mut fragments = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.size).min(chars.len());
            let content: String = chars[start..end].iter().collect();
            fragments.push(Fragment::new(content, start, end));

            if end >= chars.len() {
                break;
            }
            start += step;
        }

        fragments
    }

    /// Estimate fragment count without materializing the fragments
    #[must_use]
    pub fn estimate_fragments(&self, text: &str) -> usize {
        let char_count = text.chars().count();
        if char_count == 0 {
            return 0;
        }
        if char_count <= self.size {
            return 1;
        }
        let step = self.size - self.overlap;
        1 + (char_count - self.overlap).saturating_sub(1) / step
    }
}
