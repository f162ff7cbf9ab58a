use crate::gateway::Gateway;
use crate::protocol::{ExecuteMethodParams, ToolResult};

use super::finish;

/// Handle an `execute_method` tool call.
pub async fn handle(params: ExecuteMethodParams, gateway: &Gateway) -> ToolResult {
    finish(
        gateway
            .execute_method(
                &params.model,
                &params.method,
                params.args.unwrap_or_default(),
                params.kwargs.unwrap_or_default(),
            )
            .await,
    )
}
