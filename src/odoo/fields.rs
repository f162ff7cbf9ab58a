use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::{FieldMap, Model};
use crate::error::GatewayError;

/// Field types whose values can be arbitrarily large (base64 blobs, rich
/// text). Left out of reads that do not name their fields.
pub const DANGEROUS_FIELD_TYPES: [&str; 3] = ["binary", "image", "html"];

/// Attributes requested by `get_fields` when the caller names none.
pub const DEFAULT_FIELD_ATTRIBUTES: [&str; 10] = [
    "type",
    "string",
    "help",
    "required",
    "readonly",
    "store",
    "selection",
    "comodel_name",
    "inverse_name",
    "domain",
];

/// Metadata of one field, exactly as the server describes it.
///
/// Only the attributes that were requested are present, so every accessor
/// is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldDescriptor(Map<String, Value>);

impl FieldDescriptor {
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.0
    }

    /// Type tag such as `char`, `many2one` or `binary`.
    pub fn field_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn label(&self) -> Option<&str> {
        self.0.get("string").and_then(Value::as_str)
    }

    pub fn is_required(&self) -> bool {
        self.flag("required")
    }

    pub fn is_readonly(&self) -> bool {
        self.flag("readonly")
    }

    pub fn is_stored(&self) -> bool {
        self.flag("store")
    }

    /// Related entity of a relational field.
    pub fn relation(&self) -> Option<&str> {
        self.0
            .get("comodel_name")
            .or_else(|| self.0.get("relation"))
            .and_then(Value::as_str)
    }

    pub fn relation_domain(&self) -> Option<&Value> {
        self.0.get("domain")
    }

    /// `Some` for `date` and `datetime` fields.
    pub fn temporal_kind(&self) -> Option<TemporalKind> {
        match self.field_type()? {
            "date" => Some(TemporalKind::Date),
            "datetime" => Some(TemporalKind::DateTime),
            _ => None,
        }
    }

    /// Whether the type is one of [`DANGEROUS_FIELD_TYPES`].
    pub fn carries_payload(&self) -> bool {
        self.field_type()
            .is_some_and(|kind| DANGEROUS_FIELD_TYPES.contains(&kind))
    }

    fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

/// Field types whose values are rewritten into canonical text on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    Date,
    DateTime,
}

/// Date and date-time fields of a read, by field name.
pub type TemporalFields = BTreeMap<String, TemporalKind>;

/// Fields to read and which of them hold dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadPlan {
    pub fields: Vec<String>,
    pub temporal: TemporalFields,
}

impl ReadPlan {
    /// Without `requested`, every field not in [`DANGEROUS_FIELD_TYPES`] is
    /// read. Requested names are kept as given, including unknown ones.
    pub fn new(requested: Option<Vec<String>>, descriptors: &FieldMap) -> Self {
        let temporal = descriptors
            .iter()
            .filter_map(|(name, descriptor)| Some((name.clone(), descriptor.temporal_kind()?)))
            .collect();
        let fields = match requested {
            Some(fields) => fields,
            None => descriptors
                .iter()
                .filter(|(_, descriptor)| !descriptor.carries_payload())
                .map(|(name, _)| name.clone())
                .collect(),
        };
        Self { fields, temporal }
    }
}

/// Plan a read of `model` with one `fields_get` call for the field types.
///
/// Queries the server on every call. A `fields_get` failure is returned as
/// is rather than falling back to all fields.
pub async fn plan_read(
    model: &Model<'_>,
    requested: Option<Vec<String>>,
) -> Result<ReadPlan, GatewayError> {
    let attributes = ["type".to_string()];
    let descriptors = model
        .fields_get(requested.as_deref(), Some(&attributes[..]))
        .await?;
    Ok(ReadPlan::new(requested, &descriptors))
}

/// Names of the fields of `model` that are safe to read by default, sorted.
pub async fn safe_fields(model: &Model<'_>) -> Result<Vec<String>, GatewayError> {
    Ok(plan_read(model, None).await?.fields)
}
