//! Feature-file export
//!
//! The run's single output artifact: a UTF-8 `<KEY>.feature` file with a
//! ticket header, a fixed section label, and the trimmed generated text
//! terminated by one newline.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Result, Ticket};

/// Fixed section label written above the generated scenarios
pub const FEATURE_LABEL: &str = "Feature: Acceptance Criteria";

/// Render the feature-file contents for a ticket and its generated scenarios
#[must_use]
pub fn render_feature(ticket: &Ticket, generated: &str) -> String {
    format!(
        "# Jira Ticket: {}\n# Summary: {}\n\n{FEATURE_LABEL}\n\n{}\n",
        ticket.key,
        ticket.summary,
        generated.trim()
    )
}

/// Write the `<KEY>.feature` artifact under `dir` and return its path
pub fn write_feature(dir: &Path, ticket: &Ticket, generated: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{}.feature", ticket.key));
    fs::write(&path, render_feature(ticket, generated))?;
    Ok(path)
}
