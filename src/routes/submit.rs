use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::models::SubmissionInput;
use crate::state::SharedState;
use crate::submission::{metadata, parser, pipeline};

/// Accept a lead from the contact form and fan it out to Notion and Slack.
///
/// Responds 200 as long as at least one integration took the lead.
pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let raw = parser::parse_body(content_type, &body).unwrap_or_else(|e| {
        tracing::debug!("Unreadable submission body: {e}");
        serde_json::Value::Null
    });

    let input = SubmissionInput::from_value(&raw);
    if input.contact().is_none() {
        return Err(AppError::BadRequest(
            "Name and email are required".to_string(),
        ));
    }

    let meta = metadata::extract(&headers, Some(addr.ip()), &state.config.trusted_proxies);

    let outcome = pipeline::run(&state, &input, &meta).await;

    if outcome.all_failed() {
        tracing::error!("Submission failed: no integration accepted the lead");
        return Err(AppError::SubmissionFailed);
    }

    Ok((StatusCode::OK, Json(json!({ "success": true }))).into_response())
}

/// Any method other than POST on the submit route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
