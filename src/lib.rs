use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod stdio;

use domain::registry::ToolRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ToolRegistry>,
    pub apps_challenge_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(registry: ToolRegistry, apps_challenge_token: Option<String>) -> Self {
        Self {
            registry: Arc::new(registry),
            apps_challenge_token: apps_challenge_token.map(Arc::<str>::from),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .route(
            "/.well-known/openai-apps-challenge",
            get(http::handlers::apps_challenge),
        )
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
