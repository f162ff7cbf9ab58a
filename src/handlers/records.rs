use crate::gateway::Gateway;
use crate::odoo::ReadOptions;
use crate::protocol::{
    CountRecordsParams, CreateRecordParams, DeleteRecordParams, ReadRecordsParams,
    SearchRecordsParams, ToolResult, UpdateRecordParams,
};

use super::finish;

/// Handle a `search_records` tool call.
pub async fn search(params: SearchRecordsParams, gateway: &Gateway) -> ToolResult {
    let domain = params.domain.unwrap_or_default();
    let options = ReadOptions {
        fields: params.fields,
        limit: params.limit,
        offset: params.offset,
        order: params.order,
    };
    finish(gateway.search_records(&params.model, &domain, options).await)
}

/// Handle a `count_records` tool call.
pub async fn count(params: CountRecordsParams, gateway: &Gateway) -> ToolResult {
    let domain = params.domain.unwrap_or_default();
    finish(gateway.count_records(&params.model, &domain).await)
}

/// Handle a `read_records` tool call.
pub async fn read(params: ReadRecordsParams, gateway: &Gateway) -> ToolResult {
    finish(
        gateway
            .read_records(&params.model, &params.ids, params.fields)
            .await,
    )
}

/// Handle a `create_record` tool call.
pub async fn create(params: CreateRecordParams, gateway: &Gateway) -> ToolResult {
    finish(gateway.create_record(&params.model, &params.values).await)
}

/// Handle an `update_record` tool call.
///
/// A `false` write result is a successful tool call with `success: false`
/// in its payload.
pub async fn update(params: UpdateRecordParams, gateway: &Gateway) -> ToolResult {
    finish(
        gateway
            .update_record(&params.model, params.ids, &params.values)
            .await,
    )
}

/// Handle a `delete_record` tool call.
pub async fn delete(params: DeleteRecordParams, gateway: &Gateway) -> ToolResult {
    finish(gateway.delete_record(&params.model, params.ids).await)
}
