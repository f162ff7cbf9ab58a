use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::odoo::{CreateValues, Domain, DEFAULT_LIMIT};

/// JSON-RPC 2.0 request id, a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(i64),
    Str(String),
}

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<RpcId>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// MCP `initialize` params.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Option<String>,
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information sent during `initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

/// Parameters for `resources/read`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceReadParams {
    pub uri: String,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Parameters for the `list_models` tool.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListModelsParams {
    pub name_filter: Option<String>,
}

/// Parameters for the `get_fields` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct GetFieldsParams {
    pub model: String,
    pub field_filter: Option<String>,
    pub fields: Option<Vec<String>>,
    pub attributes: Option<Vec<String>>,
}

/// Parameters for the `execute_method` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteMethodParams {
    pub model: String,
    pub method: String,
    pub args: Option<Vec<Value>>,
    pub kwargs: Option<Map<String, Value>>,
}

/// Parameters for the `search_records` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRecordsParams {
    pub model: String,
    pub domain: Option<Domain>,
    /// `None` reads the safe fields only.
    pub fields: Option<Vec<String>>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    pub order: Option<String>,
}

/// Parameters for the `count_records` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct CountRecordsParams {
    pub model: String,
    pub domain: Option<Domain>,
}

/// Parameters for the `read_records` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadRecordsParams {
    pub model: String,
    pub ids: Vec<i64>,
    pub fields: Option<Vec<String>>,
}

/// Parameters for the `create_record` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecordParams {
    pub model: String,
    pub values: CreateValues,
}

/// Parameters for the `update_record` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRecordParams {
    pub model: String,
    pub ids: Vec<i64>,
    pub values: Map<String, Value>,
}

/// Parameters for the `delete_record` tool.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRecordParams {
    pub model: String,
    pub ids: Vec<i64>,
}
