pub mod catalog;
pub mod execute;
pub mod models;
pub mod records;
pub mod resources;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::protocol::{
    InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpErrorResponse,
    ResourceReadParams, ToolCallParams, ToolResult,
};
use crate::schema::validate_value;

/// Protocol revision offered when the client asks for none we know.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(req: &JsonRpcRequest, gateway: &Gateway) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            let params: Option<InitializeParams> = req
                .params
                .as_ref()
                .and_then(|v| serde_json::from_value(v.clone()).ok());
            if let Some(client) = params.as_ref().and_then(|p| p.client_info.as_ref()) {
                eprintln!(
                    "Client {} {} connected",
                    client.name.as_deref().unwrap_or("unknown"),
                    client.version.as_deref().unwrap_or("")
                );
            }
            let protocol_version = params
                .and_then(|p| p.protocol_version)
                .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(&v.as_str()))
                .unwrap_or_else(|| PROTOCOL_VERSION.to_string());

            let result = serde_json::json!({
                "protocolVersion": protocol_version,
                "capabilities": {
                    "tools": {},
                    "resources": {}
                },
                "serverInfo": {
                    "name": "odoo-mcp-server",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))),

        "tools/list" => {
            let result = serde_json::json!({ "tools": catalog::tools() });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "tools/call" => {
            let params: ToolCallParams = match parse_params(req, "tools/call") {
                Ok(p) => p,
                Err(err) => return Some(JsonRpcResponse::error(req.id.clone(), err)),
            };

            let tool_result = dispatch_tool_call(params, gateway).await;
            match serde_json::to_value(&tool_result) {
                Ok(result) => Some(JsonRpcResponse::success(req.id.clone(), result)),
                Err(e) => Some(JsonRpcResponse::error(
                    req.id.clone(),
                    JsonRpcError::internal_error(format!("Cannot encode tool result: {e}")),
                )),
            }
        }

        "resources/list" => Some(JsonRpcResponse::success(
            req.id.clone(),
            catalog::resources(),
        )),

        "resources/templates/list" => Some(JsonRpcResponse::success(
            req.id.clone(),
            catalog::resource_templates(),
        )),

        "resources/read" => {
            let params: ResourceReadParams = match parse_params(req, "resources/read") {
                Ok(p) => p,
                Err(err) => return Some(JsonRpcResponse::error(req.id.clone(), err)),
            };

            let response = match resources::read(params, gateway).await {
                Ok(contents) => match serde_json::to_value(&contents) {
                    Ok(result) => JsonRpcResponse::success(req.id.clone(), result),
                    Err(e) => JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::internal_error(format!("Cannot encode resource: {e}")),
                    ),
                },
                Err(err) => JsonRpcResponse::error(req.id.clone(), err),
            };
            Some(response)
        }

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}

fn parse_params<T: DeserializeOwned>(
    req: &JsonRpcRequest,
    method: &str,
) -> Result<T, JsonRpcError> {
    match &req.params {
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid {method} params: {e}"))),
        None => Err(JsonRpcError::invalid_params(format!(
            "Missing params for {method}"
        ))),
    }
}

/// Check `arguments` against the tool's advertised input schema, then
/// decode them into the tool's parameter type.
fn parse_arguments<T: DeserializeOwned>(
    tool: &catalog::ToolDefinition,
    arguments: Value,
) -> Result<T, ToolResult> {
    if let Err(e) = validate_value(&tool.input_schema, &arguments) {
        return Err(ToolResult::error(format!(
            "Invalid arguments for {}: {e}",
            tool.name
        )));
    }
    serde_json::from_value(arguments).map_err(|e| {
        ToolResult::error(format!("Invalid arguments for {}: {e}", tool.name))
    })
}

async fn dispatch_tool_call(params: ToolCallParams, gateway: &Gateway) -> ToolResult {
    let Some(tool) = catalog::find_tool(&params.name) else {
        return ToolResult::error(format!("Unknown tool: {}", params.name));
    };
    let arguments = params
        .arguments
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

    match tool.name {
        "list_models" => match parse_arguments(&tool, arguments) {
            Ok(p) => models::list(p, gateway).await,
            Err(result) => result,
        },
        "get_fields" => match parse_arguments(&tool, arguments) {
            Ok(p) => models::fields(p, gateway).await,
            Err(result) => result,
        },
        "execute_method" => match parse_arguments(&tool, arguments) {
            Ok(p) => execute::handle(p, gateway).await,
            Err(result) => result,
        },
        "search_records" => match parse_arguments(&tool, arguments) {
            Ok(p) => records::search(p, gateway).await,
            Err(result) => result,
        },
        "count_records" => match parse_arguments(&tool, arguments) {
            Ok(p) => records::count(p, gateway).await,
            Err(result) => result,
        },
        "read_records" => match parse_arguments(&tool, arguments) {
            Ok(p) => records::read(p, gateway).await,
            Err(result) => result,
        },
        "create_record" => match parse_arguments(&tool, arguments) {
            Ok(p) => records::create(p, gateway).await,
            Err(result) => result,
        },
        "update_record" => match parse_arguments(&tool, arguments) {
            Ok(p) => records::update(p, gateway).await,
            Err(result) => result,
        },
        "delete_record" => match parse_arguments(&tool, arguments) {
            Ok(p) => records::delete(p, gateway).await,
            Err(result) => result,
        },
        _ => ToolResult::error(format!("Unknown tool: {}", params.name)),
    }
}

/// Log a gateway failure to stderr and convert it for the caller.
pub(crate) fn report(err: GatewayError) -> McpErrorResponse {
    match &err {
        GatewayError::Connectivity(detail) => eprintln!("Odoo connection failed: {detail}"),
        GatewayError::RpcFault(message) => eprintln!("Odoo rejected the call: {message}"),
        GatewayError::Policy { operation } => {
            eprintln!("Blocked '{operation}' in READONLY_MODE")
        }
        GatewayError::Protocol(detail) => eprintln!("Unexpected Odoo response: {detail}"),
        GatewayError::InvalidDomain(e) => eprintln!("Rejected domain: {e}"),
        GatewayError::Encoding(e) => eprintln!("Serialization failed: {e}"),
    }
    McpErrorResponse::from(err)
}

pub(crate) fn finish(result: Result<String, GatewayError>) -> ToolResult {
    match result {
        Ok(text) => ToolResult::text(text),
        Err(err) => report(err).into(),
    }
}
