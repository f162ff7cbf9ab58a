use crate::gateway::Gateway;
use crate::protocol::{JsonRpcError, ResourceReadParams, ResourceReadResult};

use super::report;

const SCHEME: &str = "odoo://";

/// An addressable read-only resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    /// `odoo://models`
    Models,
    /// `odoo://model/{model_name}`
    ModelFields(String),
    /// `odoo://record/{model_name}/{record_id}`
    Record { model: String, id: i64 },
}

impl ResourceUri {
    pub fn parse(uri: &str) -> Option<Self> {
        let path = uri.strip_prefix(SCHEME)?;
        if path == "models" {
            return Some(Self::Models);
        }
        if let Some(model) = path.strip_prefix("model/") {
            if model.is_empty() || model.contains('/') {
                return None;
            }
            return Some(Self::ModelFields(model.to_string()));
        }
        let rest = path.strip_prefix("record/")?;
        let (model, id) = rest.split_once('/')?;
        if model.is_empty() {
            return None;
        }
        let id = id.parse::<i64>().ok()?;
        Some(Self::Record {
            model: model.to_string(),
            id,
        })
    }
}

/// Handle a `resources/read` request.
pub async fn read(
    params: ResourceReadParams,
    gateway: &Gateway,
) -> Result<ResourceReadResult, JsonRpcError> {
    let resource = ResourceUri::parse(&params.uri).ok_or_else(|| {
        JsonRpcError::invalid_params(format!("Unknown resource: {}", params.uri))
    })?;

    let text = match &resource {
        ResourceUri::Models => gateway.list_models(None).await,
        ResourceUri::ModelFields(model) => gateway.get_fields(model, None, None, None).await,
        ResourceUri::Record { model, id } => gateway.read_record(model, *id).await,
    }
    .map_err(|err| JsonRpcError::from(report(err)))?;

    Ok(ResourceReadResult::json(params.uri, text))
}
