use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::gateway::Gateway;
use crate::handlers;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Maximum bytes per JSON-RPC message (1 MiB).
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

type ServeResult = Result<(), Box<dyn std::error::Error>>;

/// MCP server speaking newline-delimited JSON-RPC 2.0.
///
/// Requests are handled one at a time in arrival order, so at most one
/// Odoo call is in flight.
pub struct McpServer {
    gateway: Gateway,
    initialized: bool,
}

impl McpServer {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            initialized: false,
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Serve stdin/stdout until stdin closes.
    pub async fn run(&mut self) -> ServeResult {
        let reader = BufReader::new(tokio::io::stdin());
        self.serve(reader, tokio::io::stdout()).await
    }

    /// Serve one session over `reader`/`writer` until end of input.
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> ServeResult
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut raw = Vec::new();
        loop {
            raw.clear();
            let n = reader.read_until(b'\n', &mut raw).await?;
            if n == 0 {
                break;
            }
            if let Some(resp) = self.handle_line(&raw).await {
                write_response(&mut writer, &resp).await?;
            }
        }
        Ok(())
    }

    /// Answer one raw input line. `None` means nothing is written back:
    /// blank lines, notifications, and requests without an id sent before
    /// the handshake.
    pub async fn handle_line(&mut self, raw: &[u8]) -> Option<JsonRpcResponse> {
        if raw.len() > MAX_MESSAGE_BYTES {
            eprintln!(
                "Message too large: {} bytes (limit {MAX_MESSAGE_BYTES})",
                raw.len()
            );
            return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
        }

        let Ok(text) = std::str::from_utf8(raw) else {
            return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
        };
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let req: JsonRpcRequest = match serde_json::from_str(text) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Parse error: {e}");
                return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
            }
        };

        if req.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                req.id.clone(),
                JsonRpcError::invalid_request(),
            ));
        }

        // Only `initialize` is accepted before the handshake.
        if !self.initialized && req.method != "initialize" {
            return req.id.clone().map(|id| {
                JsonRpcResponse::error(
                    Some(id),
                    JsonRpcError::invalid_request_with("Server not initialized"),
                )
            });
        }

        let resp = handlers::dispatch(&req, &self.gateway).await;
        if req.method == "initialize" && !self.initialized {
            self.initialized = true;
            eprintln!(
                "Session initialized (READONLY_MODE {})",
                if self.gateway.policy().is_readonly() { "on" } else { "off" }
            );
        }
        resp
    }
}

async fn write_response<W>(writer: &mut W, resp: &JsonRpcResponse) -> ServeResult
where
    W: AsyncWrite + Unpin,
{
    let out = serde_json::to_string(resp)?;
    writer.write_all(out.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
