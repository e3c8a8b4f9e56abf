//! Shared argument decoding and validation for the built-in tools

use rust_mcp_sdk::schema::Tool;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::errors::AppError;

pub const DEFAULT_PLAYBOOK_LIMIT: usize = 3;
pub const MAX_PLAYBOOK_LIMIT: usize = 10;

pub fn parse_arguments<T: DeserializeOwned>(arguments: Map<String, Value>) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|err| AppError::invalid_params("invalid_arguments", err.to_string()))
}

pub fn normalize_playbook_limit(limit: Option<u32>) -> Result<usize, AppError> {
    let Some(limit) = limit else {
        return Ok(DEFAULT_PLAYBOOK_LIMIT);
    };

    let limit = limit as usize;
    if limit == 0 || limit > MAX_PLAYBOOK_LIMIT {
        return Err(AppError::invalid_params(
            "invalid_limit",
            format!("limit must be between 1 and {MAX_PLAYBOOK_LIMIT}"),
        ));
    }

    Ok(limit)
}

/// Adds inclusive `minimum`/`maximum` bounds to an integer property of a tool's input schema.
pub fn bound_integer_property(tool: Tool, property: &str, minimum: u64, maximum: u64) -> Tool {
    let Ok(mut descriptor) = serde_json::to_value(&tool) else {
        return tool;
    };

    let Some(schema) = descriptor
        .get_mut("inputSchema")
        .and_then(|input| input.get_mut("properties"))
        .and_then(|properties| properties.get_mut(property))
        .and_then(Value::as_object_mut)
    else {
        return tool;
    };
    schema.insert("minimum".to_string(), json!(minimum));
    schema.insert("maximum".to_string(), json!(maximum));

    serde_json::from_value(descriptor).unwrap_or(tool)
}

/// Pretty-printed JSON used as the text content block of a tool result.
pub fn render_text(content: &Map<String, Value>) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(content)?)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct QueryArgs {
        query: String,
    }

    #[test]
    fn limit_defaults_to_three() {
        assert_eq!(normalize_playbook_limit(None).expect("default"), 3);
    }

    #[test]
    fn limit_bounds_are_inclusive() {
        assert_eq!(normalize_playbook_limit(Some(1)).expect("lower bound"), 1);
        assert_eq!(normalize_playbook_limit(Some(10)).expect("upper bound"), 10);

        for limit in [0, 11] {
            let err = normalize_playbook_limit(Some(limit)).expect_err("out of range");
            assert!(err.to_string().contains("invalid params"));
        }
    }

    #[test]
    fn wrong_argument_types_are_invalid_params() {
        let arguments = json!({"query": 5})
            .as_object()
            .cloned()
            .expect("object");
        let err = parse_arguments::<QueryArgs>(arguments).expect_err("query must be a string");
        assert_eq!(err.rpc_code(), -32602);
    }
}
