use serde_json::{json, Value};
use thiserror::Error;

pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const TOOL_EXECUTION_FAILED: i32 = -32000;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {message}")]
    InvalidRequest { message: &'static str },
    #[error("method not found: {method}")]
    MethodNotFound { method: String },
    #[error("tool not found: {name}")]
    ToolNotFound { name: String },
    #[error("invalid params: {message}")]
    InvalidParams {
        code: &'static str,
        message: String,
    },
    #[error("tool execution failed: {message}")]
    ToolExecutionFailed { tool: String, message: String },
    #[error("serialization failed")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn invalid_request(message: &'static str) -> Self {
        Self::InvalidRequest { message }
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound { name: name.into() }
    }

    pub fn invalid_params(code: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            code,
            message: message.into(),
        }
    }

    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecutionFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::InvalidRequest { .. } => INVALID_REQUEST,
            Self::MethodNotFound { .. } | Self::ToolNotFound { .. } => METHOD_NOT_FOUND,
            Self::InvalidParams { .. } => INVALID_PARAMS,
            Self::ToolExecutionFailed { .. } => TOOL_EXECUTION_FAILED,
            Self::Serialization(_) => INTERNAL_ERROR,
        }
    }

    pub fn rpc_message(&self) -> String {
        match self {
            Self::InvalidRequest { .. } => "Invalid Request".to_string(),
            Self::MethodNotFound { method } => format!("Method not found: {method}"),
            Self::ToolNotFound { name } => format!("Tool not found: {name}"),
            Self::InvalidParams { .. } => "Invalid params".to_string(),
            Self::ToolExecutionFailed { .. } => "Tool execution failed".to_string(),
            Self::Serialization(_) => "Internal error".to_string(),
        }
    }

    /// Diagnostic payload carried in the error object's `data` field.
    pub fn rpc_data(&self) -> Option<Value> {
        match self {
            Self::InvalidRequest { message } => Some(json!({
                "code": "invalid_request",
                "message": message,
                "details": {}
            })),
            Self::MethodNotFound { .. } => None,
            Self::ToolNotFound { name } => Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": name,
                }
            })),
            Self::InvalidParams { code, message } => Some(json!({
                "code": code,
                "message": message,
                "details": {}
            })),
            Self::ToolExecutionFailed { tool, message } => Some(json!({
                "code": "tool_execution_failed",
                "message": message,
                "details": {
                    "name": tool,
                }
            })),
            Self::Serialization(_) => None,
        }
    }
}
