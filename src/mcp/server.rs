//! The central Model Context Protocol engine
//!
//! Resolves validated requests into a [`Method`], runs it against the tool registry, and
//! turns every outcome (including handler failures) into a JSON-RPC envelope.

use std::{any::Any, sync::Arc};

use rust_mcp_sdk::schema::{
    CallToolResult, ContentBlock, Implementation, InitializeResult, ListToolsResult,
    ProtocolVersion, ServerCapabilities, ServerCapabilitiesTools, TextContent,
};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::domain::{registry::ToolHandler, utils::render_text};
use crate::errors::AppError;
use crate::logging::redact_audit_params;
use crate::mcp::rpc::{validate_request, JsonRpcResponse, RpcRequest};
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Initialize,
    Ping,
    ListTools,
    CallTool,
    Unknown(String),
}

impl From<&str> for Method {
    fn from(method: &str) -> Self {
        match method {
            "initialize" => Self::Initialize,
            "ping" => Self::Ping,
            "tools/list" => Self::ListTools,
            "tools/call" => Self::CallTool,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Validates and dispatches one envelope. `None` means the message was a notification.
pub async fn handle_json_rpc_value(state: &AppState, payload: Value) -> Option<JsonRpcResponse> {
    let request = match validate_request(payload) {
        Ok(request) => request,
        Err((id, err)) => {
            warn!(error = %err, "rejected json-rpc envelope");
            return Some(JsonRpcResponse::failure(id, &err));
        }
    };

    if request.is_notification() {
        info!(method = %request.method, "notification acknowledged");
        return None;
    }

    Some(handle_json_rpc_request(state, request).await)
}

pub async fn handle_json_rpc_request(state: &AppState, request: RpcRequest) -> JsonRpcResponse {
    let RpcRequest {
        id, method, params, ..
    } = request;
    let audit_params = redact_audit_params(params.as_ref());

    let outcome = match Method::from(method.as_str()) {
        Method::Initialize => initialize_result(),
        Method::Ping => Ok(json!({})),
        Method::ListTools => list_tools_result(state),
        Method::CallTool => call_tool(state, params).await,
        Method::Unknown(method) => Err(AppError::method_not_found(method)),
    };

    let response = match outcome {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(err) => JsonRpcResponse::failure(id, &err),
    };

    info!(
        method = %method,
        params = %audit_params,
        outcome = if response.is_error() { "failure" } else { "success" },
        "mcp action audited"
    );

    response
}

fn initialize_result() -> Result<Value, AppError> {
    let initialize_result = InitializeResult {
        server_info: Implementation {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: None,
            description: None,
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(false),
            }),
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2024_11_05.into(),
        instructions: None,
        meta: None,
    };

    Ok(serde_json::to_value(initialize_result)?)
}

fn list_tools_result(state: &AppState) -> Result<Value, AppError> {
    Ok(serde_json::to_value(ListToolsResult {
        meta: None,
        next_cursor: None,
        tools: state.registry.descriptors(),
    })?)
}

async fn call_tool(state: &AppState, params: Option<Value>) -> Result<Value, AppError> {
    let mut params = match params {
        Some(Value::Object(params)) => params,
        _ => Map::new(),
    };

    let name = match params.remove("name") {
        Some(Value::String(name)) => name,
        Some(other) => return Err(AppError::tool_not_found(other.to_string())),
        None => return Err(AppError::tool_not_found("")),
    };

    let Some(tool) = state.registry.get(&name) else {
        return Err(AppError::tool_not_found(name));
    };

    let arguments = match params.remove("arguments") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(arguments)) => arguments,
        Some(_) => {
            return Err(AppError::invalid_params(
                "invalid_arguments",
                "arguments must be an object",
            ))
        }
    };

    let structured_content = invoke_tool(Arc::clone(tool), arguments).await?;

    Ok(serde_json::to_value(CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(
            render_text(&structured_content)?,
            None,
            None,
        ))],
        is_error: None,
        meta: None,
        structured_content: Some(structured_content),
    })?)
}

/// Runs the handler on its own task so a panic is reported instead of unwinding the caller.
async fn invoke_tool(
    tool: Arc<dyn ToolHandler>,
    arguments: Map<String, Value>,
) -> Result<Map<String, Value>, AppError> {
    let name = tool.name();
    let outcome = tokio::spawn(async move { tool.invoke(arguments).await }).await;

    match outcome {
        Ok(Ok(content)) => Ok(content),
        Ok(Err(err @ AppError::InvalidParams { .. }))
        | Ok(Err(err @ AppError::ToolExecutionFailed { .. })) => Err(err),
        Ok(Err(err)) => Err(AppError::tool_failed(name, err.to_string())),
        Err(join_error) => {
            let message = if join_error.is_panic() {
                panic_message(join_error.into_panic())
            } else {
                "tool task was cancelled".to_string()
            };
            warn!(tool = name, error = %message, "tool handler failed");
            Err(AppError::tool_failed(name, message))
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "tool handler panicked".to_string()
    }
}
