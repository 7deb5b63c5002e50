pub mod config;
pub mod error;
pub mod state;
pub mod models;
pub mod routes;
pub mod integrations;
pub mod submission;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::integrations::notion::NotionSink;
use crate::integrations::slack::SlackSink;
use crate::integrations::{NotificationSink, RecordSink};
use crate::state::{AppState, SharedState};

/// Build the router with the real Notion and Slack clients.
pub fn build_app(config: Config) -> Result<Router, reqwest::Error> {
    let records = Arc::new(NotionSink::new(config.notion.clone(), config.outbound_timeout)?);
    let notifications = Arc::new(SlackSink::new(config.slack.clone(), config.outbound_timeout)?);

    Ok(build_app_with_sinks(config, records, notifications))
}

/// Build the router around caller-provided integrations.
pub fn build_app_with_sinks(
    config: Config,
    records: Arc<dyn RecordSink>,
    notifications: Arc<dyn NotificationSink>,
) -> Router {
    let cors = cors_layer(&config.cors_origins);
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        config,
        records,
        notifications,
    });

    let router = Router::new()
        .merge(routes::submit_routes(max_body_size))
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable()),
        )
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{origin}': {e}");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

async fn health() -> &'static str {
    "ok"
}
