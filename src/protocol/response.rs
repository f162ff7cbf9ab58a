use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::request::RpcId;
use crate::error::GatewayError;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 response layer
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 response envelope. Exactly one of `result` and `error` is
/// set.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn envelope(id: Option<RpcId>, result: Option<Value>, error: Option<JsonRpcError>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result,
            error,
        }
    }

    pub fn success(id: Option<RpcId>, result: Value) -> Self {
        Self::envelope(id, Some(result), None)
    }

    pub fn error(id: Option<RpcId>, error: JsonRpcError) -> Self {
        Self::envelope(id, None, Some(error))
    }
}

/// JSON-RPC 2.0 error object (protocol-level errors).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error() -> Self {
        Self::with_code(Self::PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request() -> Self {
        Self::with_code(Self::INVALID_REQUEST, "Invalid Request")
    }

    pub fn invalid_request_with(detail: impl Into<String>) -> Self {
        Self::with_code(Self::INVALID_REQUEST, detail)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::with_code(Self::METHOD_NOT_FOUND, format!("Method not found: {method}"))
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::with_code(Self::INVALID_PARAMS, detail)
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::with_code(Self::INTERNAL_ERROR, detail)
    }
}

// ---------------------------------------------------------------------------
// MCP tool result layer (returned inside a *successful* JSON-RPC response)
// ---------------------------------------------------------------------------

/// Result of `tools/call`. Tool failures travel here with `isError` set,
/// never as JSON-RPC errors.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolResultContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// A text block inside a tool result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResultContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolResult {
    fn single(text: String, is_error: bool) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text".into(),
                text,
            }],
            is_error,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::single(text.into(), false)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::single(text.into(), true)
    }
}

// ---------------------------------------------------------------------------
// MCP resource layer
// ---------------------------------------------------------------------------

/// Result of `resources/read`.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceReadResult {
    pub contents: Vec<ResourceContent>,
}

/// Text contents of one resource.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceContent {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

impl ResourceReadResult {
    pub fn json(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            contents: vec![ResourceContent {
                uri: uri.into(),
                mime_type: "application/json".into(),
                text: text.into(),
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// MCP domain-level error types
// ---------------------------------------------------------------------------

/// MCP error code (v0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McpErrorCode {
    ConnectivityError,
    RpcFault,
    PolicyDenied,
    InvalidParams,
    InternalError,
}

impl McpErrorCode {
    /// Map to the corresponding JSON-RPC 2.0 error code.
    ///
    /// Caller-side failures → -32602 (Invalid params)
    /// Server-side failures → -32603 (Internal error)
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            Self::InvalidParams | Self::PolicyDenied => JsonRpcError::INVALID_PARAMS,
            Self::ConnectivityError | Self::RpcFault | Self::InternalError => {
                JsonRpcError::INTERNAL_ERROR
            }
        }
    }
}

/// MCP error object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpError {
    pub code: McpErrorCode,
    pub message: String,
}

/// MCP error response (top-level)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpErrorResponse {
    pub error: McpError,
}

impl McpErrorResponse {
    pub fn new(code: McpErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: McpError {
                code,
                message: message.into(),
            },
        }
    }

    /// Construct with the fixed message for a given code.
    pub fn canonical(code: McpErrorCode) -> Self {
        let message = match &code {
            McpErrorCode::ConnectivityError => "Cannot connect to the Odoo server",
            McpErrorCode::RpcFault => "The Odoo server rejected the request",
            McpErrorCode::PolicyDenied => "Operation is not allowed in READONLY_MODE",
            McpErrorCode::InvalidParams => "Invalid parameters",
            McpErrorCode::InternalError => "Internal error",
        };
        Self::new(code, message)
    }
}

/// Remote faults and policy rejections keep their text; connectivity and
/// decoding failures are reduced to the fixed message so transport detail
/// never reaches the caller.
impl From<GatewayError> for McpErrorResponse {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Connectivity(_) => Self::canonical(McpErrorCode::ConnectivityError),
            GatewayError::RpcFault(message) if message.is_empty() => {
                Self::canonical(McpErrorCode::RpcFault)
            }
            GatewayError::RpcFault(message) => Self::new(McpErrorCode::RpcFault, message),
            policy @ GatewayError::Policy { .. } => {
                Self::new(McpErrorCode::PolicyDenied, policy.to_string())
            }
            GatewayError::Protocol(_)
            | GatewayError::InvalidDomain(_)
            | GatewayError::Encoding(_) => {
                Self::canonical(McpErrorCode::InternalError)
            }
        }
    }
}

/// Convert an MCP domain error into a JSON-RPC error.
///
/// The JSON-RPC `code` is derived from the MCP error code.
/// The JSON-RPC `message` is the human-readable MCP message.
/// The full MCP error object is carried in `data` for structured clients.
impl From<McpErrorResponse> for JsonRpcError {
    fn from(mcp: McpErrorResponse) -> Self {
        Self {
            code: mcp.error.code.json_rpc_code(),
            message: mcp.error.message.clone(),
            data: serde_json::to_value(&mcp).ok(),
        }
    }
}

/// Convert an MCP domain error into a tool result with `isError: true`.
///
/// The text content is the JSON-serialized `McpErrorResponse`, preserving
/// the structured error for clients that inspect tool output.
impl From<McpErrorResponse> for ToolResult {
    fn from(mcp: McpErrorResponse) -> Self {
        match serde_json::to_string(&mcp) {
            Ok(json) => Self::error(format!("{json}\n")),
            Err(_) => Self::error(mcp.error.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_detail_is_not_exposed() {
        let mcp = McpErrorResponse::from(GatewayError::Connectivity(
            "error sending request for url (http://10.0.0.5:8069/jsonrpc)".into(),
        ));
        assert_eq!(mcp.error.code, McpErrorCode::ConnectivityError);
        assert_eq!(mcp.error.message, "Cannot connect to the Odoo server");
    }

    #[test]
    fn remote_fault_text_is_kept() {
        let mcp = McpErrorResponse::from(GatewayError::RpcFault(
            "Object res.partnr doesn't exist".into(),
        ));
        assert_eq!(mcp.error.code, McpErrorCode::RpcFault);
        assert_eq!(mcp.error.message, "Object res.partnr doesn't exist");
    }

    #[test]
    fn policy_error_maps_to_invalid_params_code() {
        let mcp = McpErrorResponse::from(GatewayError::policy("unlink"));
        assert_eq!(mcp.error.code, McpErrorCode::PolicyDenied);
        let rpc = JsonRpcError::from(mcp);
        assert_eq!(rpc.code, -32602);
        assert!(rpc.message.contains("'unlink'"));
        assert!(rpc.data.is_some());
    }
}
