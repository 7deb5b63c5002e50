#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use lead_intake::config::Config;
use lead_intake::integrations::{NotificationSink, RecordSink, SinkError};
use lead_intake::models::SubmissionInput;

/// How a fake integration answers.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Succeed,
    Fail,
}

/// Record sink double that remembers every lead it was handed.
pub struct FakeRecords {
    behavior: Behavior,
    calls: Mutex<Vec<SubmissionInput>>,
}

impl FakeRecords {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SubmissionInput> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for FakeRecords {
    async fn create_record(&self, input: &SubmissionInput) -> Result<(), SinkError> {
        self.calls.lock().unwrap().push(input.clone());
        respond(self.behavior, "notion is down")
    }
}

/// Notification sink double that remembers every lead it was handed.
pub struct FakeNotifications {
    behavior: Behavior,
    calls: Mutex<Vec<SubmissionInput>>,
}

impl FakeNotifications {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SubmissionInput> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for FakeNotifications {
    async fn notify(&self, input: &SubmissionInput) -> Result<(), SinkError> {
        self.calls.lock().unwrap().push(input.clone());
        respond(self.behavior, "invalid_token")
    }
}

fn respond(behavior: Behavior, body: &str) -> Result<(), SinkError> {
    match behavior {
        Behavior::Succeed => Ok(()),
        Behavior::Fail => Err(SinkError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: body.to_string(),
        }),
    }
}

/// A running test server instance wired to fake integrations.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub records: Arc<FakeRecords>,
    pub notifications: Arc<FakeNotifications>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a JSON lead, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/submit"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit a form-urlencoded lead, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/submit"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Total number of outbound calls the fakes have seen.
    pub fn outbound_calls(&self) -> usize {
        self.records.calls().len() + self.notifications.calls().len()
    }
}

/// Configuration built from the given variables only, ignoring the process environment.
pub fn config_from(vars: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned()).expect("valid test configuration")
}

pub fn test_config() -> Config {
    config_from(&[("LEADS_HOST", "127.0.0.1"), ("LEADS_LOG_LEVEL", "warn")])
}

/// Spawn a test app where each integration behaves as requested.
pub async fn spawn_app(notion: Behavior, slack: Behavior) -> TestApp {
    spawn_app_with_config(test_config(), notion, slack).await
}

pub async fn spawn_app_with_config(config: Config, notion: Behavior, slack: Behavior) -> TestApp {
    let records = Arc::new(FakeRecords::new(notion));
    let notifications = Arc::new(FakeNotifications::new(slack));

    let app = lead_intake::build_app_with_sinks(config, records.clone(), notifications.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        records,
        notifications,
    }
}

/// The lead used throughout the scenarios.
pub fn ava() -> Value {
    json!({
        "name": "Ava",
        "email": "ava@x.com",
        "storeUrl": "https://ava.shop/",
        "role": "Owner",
        "subscribers": "1k-10k",
        "message": "Need help with email flows",
    })
}
