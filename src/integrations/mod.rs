pub mod notion;
pub mod slack;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::models::SubmissionInput;

/// Longest slice of a downstream response body kept for the logs.
const MAX_LOGGED_BODY: usize = 1024;

/// The downstream services a lead is forwarded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Integration {
    Notion,
    Slack,
}

impl Integration {
    pub const ALL: [Integration; 2] = [Integration::Notion, Integration::Slack];

    pub fn as_str(&self) -> &'static str {
        match self {
            Integration::Notion => "notion",
            Integration::Slack => "slack",
        }
    }
}

impl std::fmt::Display for Integration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum SinkError {
    /// The service answered with a non-2xx status.
    Status { status: StatusCode, body: String },
    /// The request never got a response: bad URL, DNS, connect, timeout.
    Transport(reqwest::Error),
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkError::Status { status, body } => write!(f, "status {status}: {body}"),
            SinkError::Transport(err) => write!(f, "request failed: {err}"),
        }
    }
}

impl std::error::Error for SinkError {}

impl From<reqwest::Error> for SinkError {
    fn from(err: reqwest::Error) -> Self {
        SinkError::Transport(err)
    }
}

/// Stores one row per lead in the workspace database.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn create_record(&self, input: &SubmissionInput) -> Result<(), SinkError>;
}

/// Posts a formatted lead notification to the team chat.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, input: &SubmissionInput) -> Result<(), SinkError>;
}

/// Integrations that failed while handling a single submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeSet {
    failed: Vec<Integration>,
}

impl OutcomeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&mut self, integration: Integration) {
        if !self.failed.contains(&integration) {
            self.failed.push(integration);
            self.failed.sort();
        }
    }

    pub fn failed(&self) -> &[Integration] {
        &self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// True when every integration failed, i.e. the lead went nowhere.
    pub fn all_failed(&self) -> bool {
        Integration::ALL.iter().all(|i| self.failed.contains(i))
    }
}

/// Turn a finished response into `Ok` on 2xx or a `SinkError::Status` carrying
/// the (truncated) response body.
async fn check_response(resp: reqwest::Response) -> Result<(), SinkError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }

    let body = match resp.text().await {
        Ok(text) => text.chars().take(MAX_LOGGED_BODY).collect::<String>(),
        Err(e) => format!("<unreadable body: {e}>"),
    };

    Err(SinkError::Status { status, body })
}

fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("lead-intake/", env!("CARGO_PKG_VERSION")))
        .build()
}
