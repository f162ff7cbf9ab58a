use serde::Serialize;
use serde_json::{json, Value};

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

const DOMAIN_DESCRIPTION: &str = "Odoo search domain in prefix notation. Examples: \
[[\"name\", \"=\", \"John\"]]; [[\"is_company\", \"=\", true], [\"active\", \"=\", true]] (AND); \
[\"|\", [\"name\", \"ilike\", \"test\"], [\"email\", \"ilike\", \"test\"]] (OR); \
[[\"order_line\", \"any\", [[\"product_uom_qty\", \">\", 5]]]]. Operators: =, !=, >, >=, <, <=, \
like, ilike, in, not in, child_of, any";

const DEFAULT_FIELDS_NOTE: &str = "Fields to return (default: all except binary/image/html)";

fn model_property() -> Value {
    json!({
        "type": "string",
        "description": "Model name (e.g. 'res.partner')"
    })
}

fn ids_property(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "integer" },
        "description": description
    })
}

fn optional_names(description: &str) -> Value {
    json!({
        "type": ["array", "null"],
        "items": { "type": "string" },
        "description": description
    })
}

fn domain_property() -> Value {
    json!({
        "type": ["array", "null"],
        "description": DOMAIN_DESCRIPTION
    })
}

/// Every tool the server offers, in advertisement order.
pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "list_models",
            description: "List available Odoo models with their technical and display names",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name_filter": {
                        "type": ["string", "null"],
                        "description": "Only models whose name contains this text (e.g. 'sale')"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "get_fields",
            description: "Get field definitions of an Odoo model",
            input_schema: json!({
                "type": "object",
                "required": ["model"],
                "properties": {
                    "model": model_property(),
                    "field_filter": {
                        "type": ["string", "null"],
                        "description": "Only fields whose name contains this text"
                    },
                    "fields": optional_names("Specific field names to describe (default: all)"),
                    "attributes": optional_names(
                        "Field attributes to return (default: type, string, help, required, \
                         readonly, store, selection, comodel_name, inverse_name, domain)"
                    )
                }
            }),
        },
        ToolDefinition {
            name: "execute_method",
            description: "Execute any method on an Odoo model. Write methods (create, write, \
                          unlink, copy) are blocked in READONLY_MODE",
            input_schema: json!({
                "type": "object",
                "required": ["model", "method"],
                "properties": {
                    "model": model_property(),
                    "method": { "type": "string", "description": "Method name to execute" },
                    "args": {
                        "type": ["array", "null"],
                        "description": "Positional arguments"
                    },
                    "kwargs": {
                        "type": ["object", "null"],
                        "description": "Keyword arguments"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "search_records",
            description: "Search records of an Odoo model. Returns records (each with a '_url' \
                          for browser access), total count, limit and offset. Binary, image and \
                          html fields are left out unless named in 'fields'",
            input_schema: json!({
                "type": "object",
                "required": ["model"],
                "properties": {
                    "model": model_property(),
                    "domain": domain_property(),
                    "fields": optional_names(DEFAULT_FIELDS_NOTE),
                    "limit": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Maximum number of records (default 100)"
                    },
                    "offset": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Number of records to skip (default 0)"
                    },
                    "order": {
                        "type": ["string", "null"],
                        "description": "Sort order (e.g. 'name asc', 'create_date desc')"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "count_records",
            description: "Count records of an Odoo model matching a domain",
            input_schema: json!({
                "type": "object",
                "required": ["model"],
                "properties": {
                    "model": model_property(),
                    "domain": domain_property()
                }
            }),
        },
        ToolDefinition {
            name: "read_records",
            description: "Read records by id. Each record includes a '_url' for browser access. \
                          Binary, image and html fields are left out unless named in 'fields'",
            input_schema: json!({
                "type": "object",
                "required": ["model", "ids"],
                "properties": {
                    "model": model_property(),
                    "ids": ids_property("Record ids to read"),
                    "fields": optional_names(DEFAULT_FIELDS_NOTE)
                }
            }),
        },
        ToolDefinition {
            name: "create_record",
            description: "Create a record from a mapping of field values, or several records \
                          from a list of mappings. Blocked in READONLY_MODE",
            input_schema: json!({
                "type": "object",
                "required": ["model", "values"],
                "properties": {
                    "model": model_property(),
                    "values": {
                        "type": ["object", "array"],
                        "items": { "type": "object" },
                        "description": "Field values, or a list of them for batch creation"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "update_record",
            description: "Update records of an Odoo model. Blocked in READONLY_MODE",
            input_schema: json!({
                "type": "object",
                "required": ["model", "ids", "values"],
                "properties": {
                    "model": model_property(),
                    "ids": ids_property("Record ids to update"),
                    "values": { "type": "object", "description": "Field values to write" }
                }
            }),
        },
        ToolDefinition {
            name: "delete_record",
            description: "Delete records of an Odoo model. Blocked in READONLY_MODE",
            input_schema: json!({
                "type": "object",
                "required": ["model", "ids"],
                "properties": {
                    "model": model_property(),
                    "ids": ids_property("Record ids to delete")
                }
            }),
        },
    ]
}

pub fn find_tool(name: &str) -> Option<ToolDefinition> {
    tools().into_iter().find(|tool| tool.name == name)
}

/// Payload of `resources/list`.
pub fn resources() -> Value {
    json!({
        "resources": [
            {
                "uri": "odoo://models",
                "name": "models",
                "description": "List all available Odoo models",
                "mimeType": "application/json"
            }
        ]
    })
}

/// Payload of `resources/templates/list`.
pub fn resource_templates() -> Value {
    json!({
        "resourceTemplates": [
            {
                "uriTemplate": "odoo://model/{model_name}",
                "name": "model_fields",
                "description": "Field definitions of an Odoo model",
                "mimeType": "application/json"
            },
            {
                "uriTemplate": "odoo://record/{model_name}/{record_id}",
                "name": "record",
                "description": "A single record without binary, image and html fields",
                "mimeType": "application/json"
            }
        ]
    })
}
