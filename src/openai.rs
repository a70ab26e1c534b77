//! OpenAI-backed embedding and generation clients
//!
//! Blocking HTTP wrappers around OpenAI-compatible endpoints. Failures
//! (network, auth, quota, rate limit) surface as [`Error::Embedding`] or
//! [`Error::Generation`]; this pipeline never retries them.

use std::time::Duration;

use crate::{embed::Embedder, generate::Generator, Error, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

/// Default OpenAI-compatible API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn build_client(api_key: &str, kind: &str) -> Result<Client> {
    if api_key.trim().is_empty() {
        return Err(Error::InvalidConfig(format!(
            "missing OpenAI API key for {kind} client"
        )));
    }

    let mut headers = HeaderMap::new();
    let auth = format!("Bearer {}", api_key.trim());
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&auth)
            .map_err(|_| Error::InvalidConfig("invalid OpenAI API key".to_string()))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .default_headers(headers)
        .build()
        .map_err(|e| Error::InvalidConfig(format!("failed to build {kind} HTTP client: {e}")))
}

/// Blocking embeddings client for OpenAI-compatible endpoints
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    /// Build a new embeddings client
    ///
    /// `dimension` must match what the chosen model returns; it is used for
    /// local consistency checks only.
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "missing OpenAI embedding model name".to_string(),
            ));
        }
        if dimension == 0 {
            return Err(Error::InvalidConfig(
                "embedding dimension must be greater than zero".to_string(),
            ));
        }

        let client = build_client(api_key, "embeddings")?;
        let endpoint = format!("{}/embeddings", base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            model,
            dimension,
        })
    }
}

impl Embedder for OpenAiEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| Error::Embedding(format!("embeddings request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(Error::Embedding(format!(
                "embeddings request returned {status}: {body}"
            )));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .map_err(|e| Error::Embedding(format!("failed to parse embeddings response: {e}")))?;

        if parsed.data.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "service returned {} embeddings for {} inputs",
                parsed.data.len(),
                texts.len()
            )));
        }

        // The API may return entries out of order; the index field restores
        // input order.
        parsed.data.sort_by_key(|entry| entry.index);
        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }

    fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[query])?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("no embedding returned for query".to_string()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Blocking chat-completions client for OpenAI-compatible endpoints
pub struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    model: String,
}

impl OpenAiGenerator {
    /// Build a new chat-completions client
    pub fn new(api_key: &str, base_url: &str, model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "missing OpenAI completion model name".to_string(),
            ));
        }

        let client = build_client(api_key, "completions")?;
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            model,
        })
    }
}

impl Generator for OpenAiGenerator {
    fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| Error::Generation(format!("completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(Error::Generation(format!(
                "completion request returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| Error::Generation(format!("failed to parse completion response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Generation("completion response had no choices".to_string()))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}
