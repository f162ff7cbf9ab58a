use crate::gateway::Gateway;
use crate::protocol::{GetFieldsParams, ListModelsParams, ToolResult};

use super::finish;

/// Handle a `list_models` tool call.
pub async fn list(params: ListModelsParams, gateway: &Gateway) -> ToolResult {
    finish(gateway.list_models(params.name_filter.as_deref()).await)
}

/// Handle a `get_fields` tool call.
///
/// Output is sorted by field name so repeated calls against an unchanged
/// schema are byte-identical.
pub async fn fields(params: GetFieldsParams, gateway: &Gateway) -> ToolResult {
    finish(
        gateway
            .get_fields(
                &params.model,
                params.field_filter.as_deref(),
                params.fields.as_deref(),
                params.attributes.as_deref(),
            )
            .await,
    )
}
