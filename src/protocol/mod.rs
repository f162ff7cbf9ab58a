pub mod request;
pub mod response;

pub use request::{
    ClientInfo, CountRecordsParams, CreateRecordParams, DeleteRecordParams, ExecuteMethodParams,
    GetFieldsParams, InitializeParams, JsonRpcRequest, ListModelsParams, ReadRecordsParams,
    ResourceReadParams, RpcId, SearchRecordsParams, ToolCallParams, UpdateRecordParams,
};
pub use response::{
    JsonRpcError, JsonRpcResponse, McpError, McpErrorCode, McpErrorResponse, ResourceContent,
    ResourceReadResult, ToolResult, ToolResultContent,
};
