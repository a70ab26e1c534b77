//! Gherkin-RAG CLI
//!
//! Fetches one Jira ticket, runs the retrieval-augmented generation pipeline,
//! prints the generated scenarios, and exports them to `<KEY>.feature`.
//!
//! Credentials come from the environment (or flags):
//!
//! ```bash
//! export JIRA_INSTANCE_URL=https://example.atlassian.net
//! export JIRA_USERNAME=qa@example.com
//! export JIRA_API_TOKEN=...
//! export OPENAI_API_KEY=...
//!
//! gherkin-rag KAN-1
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gherkin_rag::{
    export, jira::TicketFetcher, openai, JiraClient, OpenAiEmbedder, OpenAiGenerator,
    ScenarioPipelineBuilder,
};

#[derive(Parser, Debug)]
#[command(name = "gherkin-rag")]
#[command(version)]
#[command(about = "Generate Gherkin acceptance criteria from a Jira ticket", long_about = None)]
struct Cli {
    /// Jira issue key, e.g. KAN-1
    ticket: String,

    /// Jira instance URL
    #[arg(long, env = "JIRA_INSTANCE_URL")]
    jira_url: String,

    /// Jira account username (usually the account email)
    #[arg(long, env = "JIRA_USERNAME")]
    jira_username: String,

    /// Jira API token
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    jira_token: String,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = openai::DEFAULT_BASE_URL)]
    openai_base_url: String,

    /// Embedding model
    #[arg(long, default_value = "text-embedding-3-small")]
    embedding_model: String,

    /// Embedding dimension of the chosen model
    #[arg(long, default_value_t = 1536)]
    embedding_dimension: usize,

    /// Chat model used for scenario generation
    #[arg(long, default_value = "gpt-4o-mini")]
    completion_model: String,

    /// Fragment window size in chars
    #[arg(long, default_value_t = 500)]
    chunk_size: usize,

    /// Overlap between consecutive fragments in chars
    #[arg(long, default_value_t = 50)]
    chunk_overlap: usize,

    /// Number of fragments retrieved for the prompt
    #[arg(long, default_value_t = 3)]
    top_k: usize,

    /// Sampling temperature for the generation model
    #[arg(long, default_value_t = 0.0)]
    temperature: f32,

    /// Directory the .feature file is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the assembled prompt and skip the generation call
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let tracker = JiraClient::new(&cli.jira_url, &cli.jira_username, &cli.jira_token)
        .context("failed to configure Jira client")?;

    let embedder = OpenAiEmbedder::new(
        &cli.openai_api_key,
        &cli.openai_base_url,
        &cli.embedding_model,
        cli.embedding_dimension,
    )
    .context("failed to configure embedding client")?;

    let generator = OpenAiGenerator::new(
        &cli.openai_api_key,
        &cli.openai_base_url,
        &cli.completion_model,
    )
    .context("failed to configure completion client")?;

    let pipeline = ScenarioPipelineBuilder::new()
        .embedder(embedder)
        .generator(generator)
        .chunking(cli.chunk_size, cli.chunk_overlap)
        .top_k(cli.top_k)
        .temperature(cli.temperature)
        .build()
        .context("failed to build pipeline")?;

    let ticket = tracker
        .fetch(&cli.ticket)
        .with_context(|| format!("failed to fetch ticket {}", cli.ticket))?;

    println!("Ticket: {ticket}");

    if cli.dry_run {
        let assembled = pipeline
            .prepare(&ticket)
            .context("failed to assemble prompt")?;
        println!(
            "Fragments: {} (retrieved {})",
            assembled.fragment_count,
            assembled.retrieved.len()
        );
        println!("--- Assembled Prompt ---\n{}", assembled.prompt);
        println!("dry-run enabled; skipping generation call.");
        return Ok(());
    }

    let run = pipeline
        .run(&ticket)
        .with_context(|| format!("pipeline run failed for ticket {}", cli.ticket))?;

    println!(
        "Fragments: {} (retrieved {})",
        run.fragment_count,
        run.retrieved.len()
    );
    println!("--- Generated Acceptance Criteria ---\n{}", run.scenarios.trim());

    let path = export::write_feature(&cli.output_dir, &ticket, &run.scenarios)
        .context("failed to write feature file")?;
    println!("Exported to: {}", path.display());

    Ok(())
}
