//! Axum HTTP handlers for the web server
//!
//! Provides the Model Context Protocol endpoint, plus health, discovery and domain
//! verification endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::{AppError, INVALID_REQUEST};
use crate::mcp::{rpc::JsonRpcResponse, server::handle_json_rpc_value};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub mcp_endpoint: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        mcp_endpoint: "/mcp",
    })
}

pub async fn apps_challenge(State(state): State<AppState>) -> Response {
    match state.apps_challenge_token {
        Some(token) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            token.to_string(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => {
            let err = AppError::invalid_request("request body must be valid JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::failure(Value::Null, &err)),
            )
                .into_response();
        }
    };

    match handle_json_rpc_value(&state, payload).await {
        Some(response) if response.error_code() == Some(INVALID_REQUEST) => {
            (StatusCode::BAD_REQUEST, Json(response)).into_response()
        }
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
