//! Jira ticket fetching
//!
//! The tracker is an external collaborator with a narrow contract: given an
//! issue key, return its summary and description. Any fetch failure is fatal
//! for the run.

use std::time::Duration;

use crate::{Error, Result, Ticket};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for fetching a single ticket by key
pub trait TicketFetcher {
    /// Fetch the ticket identified by `key`
    fn fetch(&self, key: &str) -> Result<Ticket>;
}

/// Blocking Jira REST client using basic auth (username + API token)
pub struct JiraClient {
    client: Client,
    base_url: String,
    username: String,
    api_token: String,
}

impl JiraClient {
    /// Build a new Jira client, validating that credentials are present
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let username = username.into();
        let api_token = api_token.into();

        if base_url.trim().is_empty() {
            return Err(Error::InvalidConfig("missing Jira instance URL".to_string()));
        }
        if username.trim().is_empty() {
            return Err(Error::InvalidConfig("missing Jira username".to_string()));
        }
        if api_token.trim().is_empty() {
            return Err(Error::InvalidConfig("missing Jira API token".to_string()));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build Jira HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            api_token,
        })
    }

    fn issue_url(&self, key: &str) -> String {
        format!("{}/rest/api/2/issue/{key}", self.base_url)
    }
}

impl TicketFetcher for JiraClient {
    fn fetch(&self, key: &str) -> Result<Ticket> {
        if key.trim().is_empty() {
            return Err(Error::InvalidConfig("missing ticket key".to_string()));
        }

        let response = self
            .client
            .get(self.issue_url(key))
            .basic_auth(&self.username, Some(&self.api_token))
            .send()
            .map_err(|e| Error::Tracker(format!("issue request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::TicketNotFound(key.to_string()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(Error::Tracker(format!(
                "issue request returned {status}: {body}"
            )));
        }

        let parsed: IssueResponse = response
            .json()
            .map_err(|e| Error::Tracker(format!("failed to parse issue response: {e}")))?;

        Ok(Ticket::new(
            key,
            parsed.fields.summary.unwrap_or_default(),
            parsed.fields.description.unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    summary: Option<String>,
    description: Option<String>,
}
