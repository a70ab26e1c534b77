//! Gherkin-RAG: single-shot retrieval-augmented Gherkin generation
//!
//! This crate fetches one issue-tracker ticket, splits its text into
//! overlapping fragments, embeds and indexes them in an in-memory vector
//! index, retrieves the fragments most relevant to a fixed acceptance-criteria
//! query, and asks a language model for tagged `Given`/`When`/`Then` scenarios
//! that can be exported as a `.feature` file.
//!
//! # Quick Start
//!
//! ```rust
//! use gherkin_rag::{
//!     embed::MockEmbedder,
//!     generate::MockGenerator,
//!     pipeline::ScenarioPipelineBuilder,
//!     Ticket,
//! };
//!
//! let pipeline = ScenarioPipelineBuilder::new()
//!     .embedder(MockEmbedder::new(128))
//!     .generator(MockGenerator::new())
//!     .build()
//!     .unwrap();
//!
//! let ticket = Ticket::new(
//!     "KAN-1",
//!     "Login fails",
//!     "User cannot log in with valid credentials",
//! );
//!
//! let run = pipeline.run(&ticket).unwrap();
//! assert!(run.prompt.contains("Login fails"));
//! assert!(!run.scenarios.is_empty());
//! ```
//!
//! # Pipeline stages
//!
//! The run is a linear, synchronous sequence with no loops or retries:
//!
//! 1. [`chunk::SlidingChunker`] - overlapping fixed-size fragments
//! 2. [`embed::Embedder`] - one fixed-dimension vector per fragment
//! 3. [`index::VectorIndex`] - in-memory cosine-similarity index, built fresh
//!    per run
//! 4. [`retrieve::Retriever`] - top-k fragments for the fixed query
//! 5. [`prompt`] - template substitution into the scenario instruction
//! 6. [`generate::Generator`] - the language-model call
//!
//! External collaborators (Jira fetch in [`jira`], OpenAI clients in
//! [`openai`], feature-file export in [`export`]) sit behind narrow traits so
//! the core is testable with substitutable fakes.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]

pub mod chunk;
pub mod embed;
pub mod error;
pub mod export;
pub mod generate;
pub mod index;
pub mod jira;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod retrieve;

pub use chunk::{Fragment, FragmentId, SlidingChunker};
pub use embed::{cosine_similarity, EmbeddedFragment, Embedder, MockEmbedder};
pub use error::{Error, Result};
pub use generate::{Generator, MockGenerator};
pub use index::{ScoredFragment, VectorIndex};
pub use jira::{JiraClient, TicketFetcher};
pub use openai::{OpenAiEmbedder, OpenAiGenerator};
pub use pipeline::{PipelineConfig, ScenarioPipeline, ScenarioPipelineBuilder};
pub use retrieve::Retriever;

/// One issue-tracker ticket, immutable once fetched
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Ticket {
    /// Tracker issue key, e.g. `KAN-1`
    pub key: String,
    /// One-line summary
    pub summary: String,
    /// Full description (empty if the tracker field is unset)
    pub description: String,
}

impl Ticket {
    /// Create a new ticket
    pub fn new(
        key: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            summary: summary.into(),
            description: description.into(),
        }
    }

    /// Canonical text fed to the chunker: summary and description labelled
    /// and separated by a blank line.
    ///
    /// Returns an empty string when both fields are empty, so a blank ticket
    /// flows through the pipeline as zero fragments.
    pub fn text(&self) -> String {
        if self.summary.is_empty() && self.description.is_empty() {
            return String::new();
        }
        format!(
            "Summary: {}\n\nDescription: {}",
            self.summary, self.description
        )
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.summary)
    }
}
