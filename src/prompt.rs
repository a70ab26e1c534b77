//! Prompt assembly from retrieved fragments
//!
//! The instruction template, the retrieval query, and the tag vocabulary are
//! fixed configuration constants, not computed.

use crate::index::ScoredFragment;

/// Fixed query used to retrieve context for scenario generation
pub const RETRIEVAL_QUERY: &str = "Generate testable acceptance criteria";

/// Separator placed between fragment contents in the context block
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Scenario category tags requested from the model
pub const SCENARIO_TAGS: [&str; 3] = ["@positive", "@negative", "@edgecase"];

/// Instruction template with a single `{context}` placeholder
pub const SCENARIO_TEMPLATE: &str = "\
As a QA Automation Engineer, given a Jira ticket, generate Gherkin-style \
acceptance criteria with @positive, @negative, and @edgecase tags to cover \
all test scenarios.
{context}

Format:
Given ...
When ...
Then ...
";

/// Assemble the generation prompt from retrieved fragments
///
/// Fragment contents are joined best-to-worst with a blank line and
/// substituted into the template. Zero retrieved fragments produce a prompt
/// with an empty context section; that is the documented degenerate path,
/// not an error.
#[must_use]
pub fn assemble(retrieved: &[ScoredFragment]) -> String {
    let context = retrieved
        .iter()
        .map(|scored| scored.fragment.content.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);

    SCENARIO_TEMPLATE.replace("{context}", &context)
}
