//! JSON-RPC envelope representations and request validation
//!
//! Every response produced by the server is a [`JsonRpcResponse`]; every request that reaches
//! the dispatcher has passed through [`validate_request`].

use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcOutcome {
    Result(Value),
    Error(RpcError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: RpcOutcome,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: RpcOutcome::Result(result),
        }
    }

    pub fn failure(id: Value, err: &AppError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: RpcOutcome::Error(RpcError {
                code: err.rpc_code(),
                message: err.rpc_message(),
                data: err.rpc_data(),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, RpcOutcome::Error(_))
    }

    pub fn error_code(&self) -> Option<i32> {
        match &self.outcome {
            RpcOutcome::Error(error) => Some(error.code),
            RpcOutcome::Result(_) => None,
        }
    }
}

/// A request envelope that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    /// Echoed verbatim into the response; `Null` when the request carried none.
    pub id: Value,
    /// `false` for id-less messages, which may be notifications.
    pub has_id: bool,
    pub method: String,
    pub params: Option<Value>,
}

impl RpcRequest {
    pub fn is_notification(&self) -> bool {
        !self.has_id && self.method.starts_with("notifications/")
    }
}

/// Checks the envelope shape. On failure the returned id is the one the caller should echo.
pub fn validate_request(payload: Value) -> Result<RpcRequest, (Value, AppError)> {
    let Value::Object(mut envelope) = payload else {
        return Err((
            Value::Null,
            AppError::invalid_request("request body must be a single JSON object"),
        ));
    };

    let has_id = envelope.contains_key("id");
    let id = envelope.remove("id").unwrap_or(Value::Null);

    if let Some(version) = envelope.get("jsonrpc") {
        if version.as_str() != Some(JSONRPC_VERSION) {
            return Err((id, AppError::invalid_request("jsonrpc must be \"2.0\"")));
        }
    }

    let method = match envelope.remove("method") {
        Some(Value::String(method)) if !method.trim().is_empty() => method,
        _ => {
            return Err((
                id,
                AppError::invalid_request("method must be a non-empty string"),
            ))
        }
    };

    Ok(RpcRequest {
        id,
        has_id,
        method,
        params: envelope.remove("params"),
    })
}
