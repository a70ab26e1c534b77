//! Pipeline orchestration: chunk, embed, index, retrieve, assemble, generate
//!
//! One linear, synchronous run per ticket. Every stage completes before the
//! next begins and any failure terminates the run.

use crate::{
    chunk::SlidingChunker,
    embed::Embedder,
    generate::{Generator, DEFAULT_TEMPERATURE},
    index::{ScoredFragment, VectorIndex},
    prompt::{self, RETRIEVAL_QUERY},
    retrieve::Retriever,
    Error, Result, Ticket,
};
use serde::{Deserialize, Serialize};

/// Pipeline configuration constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fragment window size in chars
    pub chunk_size: usize,
    /// Overlap between consecutive fragments in chars
    pub chunk_overlap: usize,
    /// Number of fragments retrieved for the prompt
    pub top_k: usize,
    /// Sampling temperature passed to the generator
    pub temperature: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 3,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl PipelineConfig {
    /// Validate configuration before any external call is made
    pub fn validate(&self) -> Result<()> {
        // Chunk parameters are validated by the chunker itself.
        SlidingChunker::new(self.chunk_size, self.chunk_overlap)?;
        if self.top_k == 0 {
            return Err(Error::InvalidConfig(
                "top_k must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Context assembled for one run, before the generation call
#[derive(Debug, Clone)]
pub struct AssembledPrompt {
    /// Number of fragments the ticket text produced
    pub fragment_count: usize,
    /// Retrieved fragments best-to-worst
    pub retrieved: Vec<ScoredFragment>,
    /// The full generation prompt
    pub prompt: String,
}

/// Result of a complete pipeline run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Number of fragments the ticket text produced
    pub fragment_count: usize,
    /// Retrieved fragments best-to-worst
    pub retrieved: Vec<ScoredFragment>,
    /// The full generation prompt
    pub prompt: String,
    /// Raw generated scenario text
    pub scenarios: String,
}

/// Single-shot scenario-generation pipeline
pub struct ScenarioPipeline<E: Embedder, G: Generator> {
    chunker: SlidingChunker,
    embedder: E,
    generator: G,
    config: PipelineConfig,
}

impl<E: Embedder, G: Generator> ScenarioPipeline<E, G> {
    /// The pipeline configuration
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The embedder used for both indexing and query embedding
    #[must_use]
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Chunk, embed, index, retrieve, and assemble the prompt for a ticket
    ///
    /// A ticket with empty text flows through as zero fragments, an empty
    /// index, an empty retrieval, and a prompt with an empty context section.
    pub fn prepare(&self, ticket: &Ticket) -> Result<AssembledPrompt> {
        let fragments = self.chunker.chunk(&ticket.text());
        let fragment_count = fragments.len();

        let embedded = self.embedder.embed_fragments(fragments)?;
        let index = VectorIndex::build(embedded)?;

        let retriever = Retriever::new(&index, &self.embedder);
        let retrieved = retriever.retrieve(RETRIEVAL_QUERY, self.config.top_k)?;

        let prompt = prompt::assemble(&retrieved);

        Ok(AssembledPrompt {
            fragment_count,
            retrieved,
            prompt,
        })
    }

    /// Run the full pipeline for one ticket, including generation
    pub fn run(&self, ticket: &Ticket) -> Result<PipelineRun> {
        let assembled = self.prepare(ticket)?;
        let scenarios = self
            .generator
            .generate(&assembled.prompt, self.config.temperature)?;

        Ok(PipelineRun {
            fragment_count: assembled.fragment_count,
            retrieved: assembled.retrieved,
            prompt: assembled.prompt,
            scenarios,
        })
    }
}

/// Builder for the scenario pipeline
pub struct ScenarioPipelineBuilder<E: Embedder, G: Generator> {
    embedder: Option<E>,
    generator: Option<G>,
    config: PipelineConfig,
}

impl<E: Embedder, G: Generator> ScenarioPipelineBuilder<E, G> {
    /// Create a new pipeline builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            embedder: None,
            generator: None,
            config: PipelineConfig::default(),
        }
    }

    /// Set the embedder
    #[must_use]
    pub fn embedder(mut self, embedder: E) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the generator
    #[must_use]
    pub fn generator(mut self, generator: G) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the full configuration
    #[must_use]
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set chunking parameters
    #[must_use]
    pub fn chunking(mut self, size: usize, overlap: usize) -> Self {
        self.config.chunk_size = size;
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the retrieval depth
    #[must_use]
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Set the generation temperature
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Build the pipeline, validating configuration
    pub fn build(self) -> Result<ScenarioPipeline<E, G>> {
        let embedder = self
            .embedder
            .ok_or_else(|| Error::InvalidConfig("embedder required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| Error::InvalidConfig("generator required".to_string()))?;

        self.config.validate()?;
        let chunker = SlidingChunker::new(self.config.chunk_size, self.config.chunk_overlap)?;

        Ok(ScenarioPipeline {
            chunker,
            embedder,
            generator,
            config: self.config,
        })
    }
}

impl<E: Embedder, G: Generator> Default for ScenarioPipelineBuilder<E, G> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::MockEmbedder;
    use crate::generate::MockGenerator;

    fn pipeline() -> ScenarioPipeline<MockEmbedder, MockGenerator> {
        ScenarioPipelineBuilder::new()
            .embedder(MockEmbedder::new(64))
            .generator(MockGenerator::new())
            .build()
            .unwrap()
    }

    // ============ PipelineConfig Tests ============

    #[test]
    fn test_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 50);
        assert_eq!(config.top_k, 3);
        assert!((config.temperature - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_validate_rejects_bad_chunking() {
        let config = PipelineConfig {
            chunk_size: 10,
            chunk_overlap: 10,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_rejects_zero_top_k() {
        let config = PipelineConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.chunk_size, deserialized.chunk_size);
        assert_eq!(config.top_k, deserialized.top_k);
    }

    // ============ Builder Tests ============

    #[test]
    fn test_builder_missing_embedder_fails() {
        let result: Result<ScenarioPipeline<MockEmbedder, MockGenerator>> =
            ScenarioPipelineBuilder::new()
                .generator(MockGenerator::new())
                .build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_missing_generator_fails() {
        let result: Result<ScenarioPipeline<MockEmbedder, MockGenerator>> =
            ScenarioPipelineBuilder::new()
                .embedder(MockEmbedder::new(64))
                .build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_invalid_chunking_fails() {
        let result = ScenarioPipelineBuilder::new()
            .embedder(MockEmbedder::new(64))
            .generator(MockGenerator::new())
            .chunking(10, 15)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_complete() {
        let pipeline = ScenarioPipelineBuilder::new()
            .embedder(MockEmbedder::new(64))
            .generator(MockGenerator::new())
            .chunking(200, 20)
            .top_k(5)
            .temperature(0.2)
            .build()
            .unwrap();

        assert_eq!(pipeline.config().chunk_size, 200);
        assert_eq!(pipeline.config().top_k, 5);
    }

    // ============ Run Tests ============

    #[test]
    fn test_run_single_fragment_ticket() {
        let ticket = Ticket::new(
            "KAN-1",
            "Login fails",
            "User cannot log in with valid credentials",
        );

        let run = pipeline().run(&ticket).unwrap();

        // Short ticket text fits in one 500-char fragment.
        assert_eq!(run.fragment_count, 1);
        assert_eq!(run.retrieved.len(), 1);
        assert!(run.prompt.contains("Login fails"));
        assert!(run.prompt.contains("User cannot log in with valid credentials"));
        assert!(!run.scenarios.is_empty());
    }

    #[test]
    fn test_run_empty_ticket_degenerate_path() {
        let ticket = Ticket::new("KAN-2", "", "");

        let run = pipeline().run(&ticket).unwrap();

        assert_eq!(run.fragment_count, 0);
        assert!(run.retrieved.is_empty());
        assert!(!run.prompt.contains("{context}"));
        assert!(run.prompt.contains("As a QA Automation Engineer"));
        assert!(!run.scenarios.is_empty());
    }

    #[test]
    fn test_run_long_ticket_produces_multiple_fragments() {
        let description = "The login page intermittently rejects valid credentials. ".repeat(20);
        let ticket = Ticket::new("KAN-3", "Login flaky", description);

        let pipeline = ScenarioPipelineBuilder::new()
            .embedder(MockEmbedder::new(64))
            .generator(MockGenerator::new())
            .chunking(100, 10)
            .build()
            .unwrap();

        let run = pipeline.run(&ticket).unwrap();
        assert!(run.fragment_count > 1);
        assert!(run.retrieved.len() <= 3);
    }

    #[test]
    fn test_prepare_skips_generation() {
        let ticket = Ticket::new("KAN-1", "Login fails", "Cannot log in");
        let assembled = pipeline().prepare(&ticket).unwrap();
        assert!(assembled.prompt.contains("Login fails"));
    }

    #[test]
    fn test_run_propagates_generation_failure() {
        struct FailingGenerator;
        impl Generator for FailingGenerator {
            fn generate(&self, _: &str, _: f32) -> Result<String> {
                Err(Error::Generation("rate limited".to_string()))
            }
            fn model_id(&self) -> &str {
                "failing"
            }
        }

        let pipeline = ScenarioPipelineBuilder::new()
            .embedder(MockEmbedder::new(64))
            .generator(FailingGenerator)
            .build()
            .unwrap();

        let ticket = Ticket::new("KAN-1", "Login fails", "Cannot log in");
        let result = pipeline.run(&ticket);
        assert!(matches!(result, Err(Error::Generation(_))));
    }

    #[test]
    fn test_run_retrieved_never_exceeds_top_k() {
        let description = "word ".repeat(400);
        let ticket = Ticket::new("KAN-4", "Many fragments", description);

        let pipeline = ScenarioPipelineBuilder::new()
            .embedder(MockEmbedder::new(32))
            .generator(MockGenerator::new())
            .chunking(50, 5)
            .top_k(3)
            .build()
            .unwrap();

        let run = pipeline.run(&ticket).unwrap();
        assert!(run.fragment_count > 3);
        assert_eq!(run.retrieved.len(), 3);
    }
}
