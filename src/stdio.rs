//! Newline-delimited JSON-RPC over standard input and output
//!
//! Requests are handled strictly in order: each line is fully dispatched and its response
//! flushed before the next line is read.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::mcp::{rpc::JsonRpcResponse, server::handle_json_rpc_value};
use crate::AppState;

pub async fn run_stdio(state: AppState) -> std::io::Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve_lines(&state, reader, writer).await
}

pub async fn serve_lines<R, W>(
    state: &AppState,
    mut reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = Vec::new();
    info!("stdio transport started");

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            break;
        }

        let response = match parse_line(&buffer) {
            Ok(None) => continue,
            Ok(Some(payload)) => handle_json_rpc_value(state, payload).await,
            Err(reason) => {
                warn!(error = %reason, "unparseable stdio line");
                Some(JsonRpcResponse::failure(
                    Value::Null,
                    &AppError::invalid_request("line must be valid UTF-8 JSON"),
                ))
            }
        };

        if let Some(response) = response {
            let mut framed = serde_json::to_vec(&response)?;
            framed.push(b'\n');
            writer.write_all(&framed).await?;
            writer.flush().await?;
        }
    }

    info!("stdin closed, stdio transport stopping");
    Ok(())
}

/// `Ok(None)` for blank lines; `Err` carries the decode failure for logging.
fn parse_line(raw: &[u8]) -> Result<Option<Value>, String> {
    let line = std::str::from_utf8(raw).map_err(|err| err.to_string())?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::registry::ToolRegistry;

    async fn run(input: impl AsRef<[u8]>) -> Vec<Value> {
        let state = AppState::new(ToolRegistry::builtin().expect("builtin registry"), None);
        let mut output = Vec::new();
        serve_lines(&state, BufReader::new(input.as_ref()), &mut output)
            .await
            .expect("stdio loop");

        String::from_utf8(output)
            .expect("utf8 output")
            .lines()
            .map(|line| serde_json::from_str(line).expect("one json response per line"))
            .collect()
    }

    #[tokio::test]
    async fn responses_preserve_request_order() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_playbook","arguments":{"id":"crisis-response"}}}"#,
            "\n",
        );

        let responses = run(input).await;
        let ids: Vec<_> = responses.iter().map(|response| response["id"].clone()).collect();
        assert_eq!(ids, [json!(1), json!(2), json!(3)]);
        assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(
            responses[2]["result"]["structuredContent"]["title"],
            "Crisis response checklist"
        );
    }

    #[tokio::test]
    async fn blank_lines_are_skipped_and_garbage_is_reported() {
        let input = "\n   \nnot json\n{\"jsonrpc\":\"2.0\",\"id\":\"x\",\"method\":\"ping\"}\n";

        let responses = run(input).await;
        assert_eq!(responses.len(), 2);
        assert!(responses[0]["id"].is_null());
        assert_eq!(responses[0]["error"]["code"], -32600);
        assert_eq!(responses[1]["id"], "x");
        assert_eq!(responses[1]["result"], json!({}));
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_stop_the_loop() {
        let mut input = br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#.to_vec();
        input.extend_from_slice(b"\n\xff\xfe\n");
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);
        input.push(b'\n');

        let responses = run(input).await;
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], 1);
        assert!(responses[1]["id"].is_null());
        assert_eq!(responses[1]["error"]["code"], -32600);
        assert_eq!(responses[2]["id"], 2);
        assert_eq!(responses[2]["result"], json!({}));
    }

    #[tokio::test]
    async fn final_line_without_newline_is_handled() {
        let responses = run(r#"{"jsonrpc":"2.0","id":8,"method":"nope"}"#).await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["error"]["message"], "Method not found: nope");
    }
}
