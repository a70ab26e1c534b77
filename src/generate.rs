//! Scenario text generation seam

use crate::Result;

/// Default sampling temperature: deterministic-leaning generation
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Trait for language-model text generation
///
/// Implementations are thin wrappers over an external model call; failures
/// surface as [`crate::Error::Generation`] and are never retried here.
pub trait Generator: Send + Sync {
    /// Generate scenario text for an assembled prompt
    fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;

    /// Model identifier
    fn model_id(&self) -> &str;
}

/// Canned-output generator for tests
#[derive(Debug, Clone)]
pub struct MockGenerator {
    output: String,
}

impl MockGenerator {
    /// Create a mock generator with a representative scenario block
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: "\
@positive
Scenario: Successful login with valid credentials
  Given a registered user on the login page
  When the user submits valid credentials
  Then the user is redirected to the dashboard

@negative
Scenario: Login rejected with wrong password
  Given a registered user on the login page
  When the user submits an incorrect password
  Then an authentication error is shown
"
            .to_string(),
        }
    }

    /// Create a mock generator with fixed output text
    #[must_use]
    pub fn with_output(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for MockGenerator {
    fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String> {
        Ok(self.output.clone())
    }

    fn model_id(&self) -> &str {
        "mock-generator"
    }
}
