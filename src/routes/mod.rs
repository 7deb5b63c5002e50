pub mod submit;

use axum::routing::post;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::SharedState;

pub fn submit_routes(max_body_size: usize) -> Router<SharedState> {
    // The body limit only wraps POST; every other method falls through to the
    // JSON 405 before anything reads the body.
    Router::new().route(
        "/api/submit",
        post(submit::submit)
            .route_layer(RequestBodyLimitLayer::new(max_body_size))
            .fallback(submit::method_not_allowed),
    )
}
