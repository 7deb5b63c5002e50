use async_trait::async_trait;
use serde_json::{Value, json};

use super::{NotificationSink, SinkError, check_response, http_client};
use crate::config::SlackConfig;
use crate::models::SubmissionInput;

const NOT_PROVIDED: &str = "Not provided";
const NOT_SPECIFIED: &str = "Not specified";

/// Posts Block Kit lead notifications to a Slack incoming webhook.
pub struct SlackSink {
    client: reqwest::Client,
    config: SlackConfig,
}

impl SlackSink {
    pub fn new(config: SlackConfig, timeout: std::time::Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client(timeout)?,
            config,
        })
    }
}

#[async_trait]
impl NotificationSink for SlackSink {
    async fn notify(&self, input: &SubmissionInput) -> Result<(), SinkError> {
        let body = build_message(input, &self.config.source_label);

        let resp = self
            .client
            .post(&self.config.webhook_url)
            .json(&body)
            .send()
            .await?;

        check_response(resp).await
    }
}

/// Build the webhook payload: a header, the contact fields, and the free-text
/// message as a trailing section when there is one.
pub fn build_message(input: &SubmissionInput, source_label: &str) -> Value {
    let mut blocks = vec![
        json!({
            "type": "header",
            "text": { "type": "plain_text", "text": source_label },
        }),
        json!({
            "type": "section",
            "fields": [
                field("Name", input.name.as_deref(), ""),
                field("Email", input.email.as_deref(), ""),
                field("Store URL", input.store_url.as_deref(), NOT_PROVIDED),
                field("Role", input.role.as_deref(), NOT_SPECIFIED),
                field("Active subscribers", input.subscribers.as_deref(), NOT_SPECIFIED),
            ],
        }),
    ];

    if let Some(message) = input.message.as_deref() {
        blocks.push(json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!("*What they want help with*\n{message}"),
            },
        }));
    }

    json!({ "blocks": blocks })
}

fn field(label: &str, value: Option<&str>, fallback: &str) -> Value {
    json!({
        "type": "mrkdwn",
        "text": format!("*{label}*\n{}", value.unwrap_or(fallback)),
    })
}
