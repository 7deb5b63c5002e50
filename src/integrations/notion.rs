use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

use super::{RecordSink, SinkError, check_response, http_client};
use crate::config::NotionConfig;
use crate::models::SubmissionInput;

/// Status every new lead row starts in.
pub const INITIAL_STATUS: &str = "New";

/// Creates one Notion database page per lead.
pub struct NotionSink {
    client: reqwest::Client,
    config: NotionConfig,
}

impl NotionSink {
    pub fn new(config: NotionConfig, timeout: std::time::Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client(timeout)?,
            config,
        })
    }
}

#[async_trait]
impl RecordSink for NotionSink {
    async fn create_record(&self, input: &SubmissionInput) -> Result<(), SinkError> {
        let body = build_page_request(input, &self.config.database_id, Utc::now());

        let resp = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.token)
            .header("Notion-Version", &self.config.version)
            .json(&body)
            .send()
            .await?;

        check_response(resp).await
    }
}

/// Build the `POST /v1/pages` body for a lead.
///
/// Optional properties are always present: an empty store URL becomes
/// `"url": null`, a missing role or subscriber bracket becomes `"select": null`
/// and a missing message becomes an empty rich-text run.
pub fn build_page_request(
    input: &SubmissionInput,
    database_id: &str,
    submitted_at: DateTime<Utc>,
) -> Value {
    json!({
        "parent": { "database_id": database_id },
        "properties": {
            "Name": {
                "title": [{ "text": { "content": input.name.as_deref().unwrap_or_default() } }],
            },
            "Email": { "email": input.email.as_deref().unwrap_or_default() },
            "Store URL": { "url": input.trimmed_store_url() },
            "Role": select(input.role.as_deref()),
            "Subscribers": select(input.subscribers.as_deref()),
            "Message": {
                "rich_text": [{ "text": { "content": input.message.as_deref().unwrap_or_default() } }],
            },
            "Submitted": {
                "date": { "start": submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true) },
            },
            "Status": select(Some(INITIAL_STATUS)),
        },
    })
}

fn select(option: Option<&str>) -> Value {
    match option {
        Some(name) => json!({ "select": { "name": name } }),
        None => json!({ "select": null }),
    }
}
