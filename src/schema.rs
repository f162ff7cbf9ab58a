use jsonschema::validator_for;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("{0}")]
    ValidationFailed(String),
}

/// Validate a JSON instance against a JSON Schema (draft 2020-12).
///
/// On failure the error carries the first violation found.
pub fn validate_value(schema: &Value, instance: &Value) -> Result<(), SchemaValidationError> {
    let validator = validator_for(schema)
        .map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    validator
        .validate(instance)
        .map_err(|e| SchemaValidationError::ValidationFailed(e.to_string()))
}

/// Like [`validate_value`], for schema and instance given as JSON text.
pub fn validate_json(schema_str: &str, instance_str: &str) -> Result<(), SchemaValidationError> {
    let schema: Value = serde_json::from_str(schema_str)
        .map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;
    let instance: Value = serde_json::from_str(instance_str)
        .map_err(|e| SchemaValidationError::ValidationFailed(e.to_string()))?;
    validate_value(&schema, &instance)
}
