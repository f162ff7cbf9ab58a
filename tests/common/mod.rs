//! In-memory stand-in for an Odoo server, plugged in behind the transport.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use odoo_mcp_server::config::ServerConfig;
use odoo_mcp_server::error::GatewayError;
use odoo_mcp_server::gateway::Gateway;
use odoo_mcp_server::odoo::{SharedConnection, Transport};
use serde_json::{json, Map, Value};

pub const BASE_URL: &str = "http://odoo.test:8069";
pub const UID: i64 = 2;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub service: String,
    pub method: String,
    pub args: Vec<Value>,
}

impl RecordedCall {
    pub fn model(&self) -> Option<&str> {
        self.args.get(3).and_then(Value::as_str)
    }

    pub fn object_method(&self) -> Option<&str> {
        self.args.get(4).and_then(Value::as_str)
    }

    pub fn positional(&self) -> Vec<Value> {
        self.args
            .get(5)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    pub fn kwargs(&self) -> Map<String, Value> {
        self.args
            .get(6)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }
}

pub struct FakeOdoo {
    calls: Mutex<Vec<RecordedCall>>,
    partners: Vec<Map<String, Value>>,
    write_result: bool,
    faults: HashMap<String, String>,
    next_id: i64,
}

impl FakeOdoo {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            partners: sample_partners(),
            write_result: true,
            faults: HashMap::new(),
            next_id: 100,
        }
    }

    pub fn with_write_result(mut self, result: bool) -> Self {
        self.write_result = result;
        self
    }

    /// Make every call of `method` fail with a remote fault.
    pub fn with_fault(mut self, method: &str, message: &str) -> Self {
        self.faults.insert(method.to_string(), message.to_string());
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn login_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.service == "common" && c.method == "login")
            .count()
    }

    /// Names of the model methods called, in order.
    pub fn object_methods(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|c| c.service == "object")
            .filter_map(|c| c.object_method().map(str::to_string))
            .collect()
    }

    pub fn last_call_of(&self, method: &str) -> RecordedCall {
        self.calls()
            .into_iter()
            .rev()
            .find(|c| c.object_method() == Some(method))
            .unwrap_or_else(|| panic!("no call of {method}"))
    }

    fn respond(&self, call: &RecordedCall) -> Result<Value, GatewayError> {
        match (call.service.as_str(), call.method.as_str()) {
            ("common", "login") => {
                if call.args.get(2) == Some(&json!("bad-key")) {
                    Ok(Value::Bool(false))
                } else {
                    Ok(json!(UID))
                }
            }
            ("object", "execute_kw") => self.execute(call),
            (service, method) => Err(GatewayError::RpcFault(format!(
                "unknown service call {service}.{method}"
            ))),
        }
    }

    fn execute(&self, call: &RecordedCall) -> Result<Value, GatewayError> {
        let model = call.model().unwrap_or_default();
        let method = call.object_method().unwrap_or_default();
        if let Some(message) = self.faults.get(method) {
            return Err(GatewayError::RpcFault(message.clone()));
        }
        let args = call.positional();
        let kwargs = call.kwargs();

        match (model, method) {
            ("ir.model", "search_read") => Ok(self.models(&args[0])),
            (_, "fields_get") => Ok(partner_fields(&kwargs)),
            (_, "search_read") => {
                let fields = names(kwargs.get("fields"));
                let offset = kwargs.get("offset").and_then(Value::as_u64).unwrap_or(0) as usize;
                let limit = kwargs.get("limit").and_then(Value::as_u64).unwrap_or(100) as usize;
                let rows: Vec<Value> = self
                    .partners
                    .iter()
                    .skip(offset)
                    .take(limit)
                    .map(|row| Value::Object(project(row, fields.as_deref())))
                    .collect();
                Ok(Value::Array(rows))
            }
            (_, "search_count") => Ok(json!(self.partners.len())),
            (_, "search") => {
                let offset = kwargs.get("offset").and_then(Value::as_u64).unwrap_or(0) as usize;
                let limit = kwargs.get("limit").and_then(Value::as_u64).unwrap_or(100) as usize;
                let ids: Vec<Value> = self
                    .partners
                    .iter()
                    .skip(offset)
                    .take(limit)
                    .map(|row| row["id"].clone())
                    .collect();
                Ok(Value::Array(ids))
            }
            (_, "read") => {
                let ids = args[0].as_array().cloned().unwrap_or_default();
                let fields = names(args.get(1));
                let rows: Vec<Value> = ids
                    .iter()
                    .filter_map(|id| self.partners.iter().find(|row| &row["id"] == id))
                    .map(|row| Value::Object(project(row, fields.as_deref())))
                    .collect();
                Ok(Value::Array(rows))
            }
            (_, "create") => match &args[0] {
                Value::Array(batch) => Ok(json!((0..batch.len() as i64)
                    .map(|offset| self.next_id + offset)
                    .collect::<Vec<_>>())),
                _ => Ok(json!(self.next_id)),
            },
            (_, "write") => Ok(Value::Bool(self.write_result)),
            (_, "unlink") => Ok(Value::Bool(true)),
            (_, other) => Ok(json!({
                "model": model,
                "method": other,
                "args": args,
                "kwargs": kwargs
            })),
        }
    }

    fn models(&self, domain: &Value) -> Value {
        let all = vec![
            json!({"id": 80, "model": "res.partner", "name": "Contact"}),
            json!({"id": 81, "model": "sale.order", "name": "Sales Order"}),
            json!({"id": 82, "model": "sale.order.line", "name": "Sales Order Line"}),
        ];
        // ["|", ["model", "ilike", x], ["name", "ilike", x]]
        let needle = domain
            .get(1)
            .and_then(|leaf| leaf.get(2))
            .and_then(Value::as_str)
            .map(str::to_lowercase);
        let rows = all
            .into_iter()
            .filter(|row| match &needle {
                Some(needle) => {
                    row["model"].as_str().unwrap().to_lowercase().contains(needle)
                        || row["name"].as_str().unwrap().to_lowercase().contains(needle)
                }
                None => true,
            })
            .collect();
        Value::Array(rows)
    }
}

#[async_trait]
impl Transport for FakeOdoo {
    async fn call(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, GatewayError> {
        let call = RecordedCall {
            service: service.to_string(),
            method: method.to_string(),
            args,
        };
        self.calls.lock().unwrap().push(call.clone());
        if service == "common" {
            // Suspend mid-login so concurrent first calls overlap.
            tokio::task::yield_now().await;
        }
        self.respond(&call)
    }
}

fn names(value: Option<&Value>) -> Option<Vec<String>> {
    value.and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

/// Odoo always returns `id`, then the requested fields in stored order.
fn project(row: &Map<String, Value>, fields: Option<&[String]>) -> Map<String, Value> {
    match fields {
        Some(fields) if !fields.is_empty() => row
            .iter()
            .filter(|(key, _)| key.as_str() == "id" || fields.iter().any(|f| f == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        _ => row.clone(),
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

pub fn sample_partners() -> Vec<Map<String, Value>> {
    vec![
        object(json!({
            "id": 1,
            "name": "Acme",
            "email": "info@acme.test",
            "ref": "2024-03-05T10:00:00",
            "image_1920": "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk",
            "comment": "<p>Key account</p>",
            "datas": "UEsDBBQAAAAIAA==",
            "create_date": "2024-03-05T10:00:00",
            "birthday": "1990-01-31",
            "company_id": [1, "My Company"]
        })),
        object(json!({
            "id": 2,
            "name": "Société Générale",
            "email": false,
            "ref": "1990-01-31",
            "image_1920": false,
            "comment": false,
            "datas": false,
            "create_date": "2024-03-06T08:30:15",
            "birthday": false,
            "company_id": false
        })),
        object(json!({
            "id": 3,
            "name": "Globex",
            "email": "hello@globex.test",
            "ref": false,
            "image_1920": false,
            "comment": "<p>Prospect</p>",
            "datas": false,
            "create_date": "2024-04-01T12:00:00+02:00",
            "birthday": false,
            "company_id": [1, "My Company"]
        })),
    ]
}

fn partner_fields(kwargs: &Map<String, Value>) -> Value {
    let all = object(json!({
        "id": {"type": "integer", "string": "ID", "required": false, "readonly": true, "store": true},
        "name": {"type": "char", "string": "Name", "required": true, "readonly": false, "store": true},
        "email": {"type": "char", "string": "Email", "required": false, "readonly": false, "store": true},
        "ref": {"type": "char", "string": "Reference", "required": false, "readonly": false, "store": true},
        "image_1920": {"type": "image", "string": "Image", "required": false, "readonly": false, "store": true},
        "comment": {"type": "html", "string": "Notes", "required": false, "readonly": false, "store": true},
        "datas": {"type": "binary", "string": "File Content", "required": false, "readonly": false, "store": false},
        "create_date": {"type": "datetime", "string": "Created on", "required": false, "readonly": true, "store": true},
        "birthday": {"type": "date", "string": "Birthday", "required": false, "readonly": false, "store": true},
        "company_id": {
            "type": "many2one",
            "string": "Company",
            "required": false,
            "readonly": false,
            "store": true,
            "comodel_name": "res.company",
            "domain": []
        }
    }));

    let wanted = names(kwargs.get("allfields"));
    let attributes = names(kwargs.get("attributes"));

    let described: Map<String, Value> = all
        .into_iter()
        .filter(|(name, _)| wanted.as_ref().map_or(true, |w| w.contains(name)))
        .map(|(name, info)| {
            let info = object(info);
            let info: Map<String, Value> = match &attributes {
                Some(attributes) => info
                    .into_iter()
                    .filter(|(key, _)| attributes.contains(key))
                    .collect(),
                None => info,
            };
            (name, Value::Object(info))
        })
        .collect();
    Value::Object(described)
}

pub fn test_config(readonly: bool) -> ServerConfig {
    ServerConfig {
        odoo_url: BASE_URL.to_string(),
        database: "test".to_string(),
        api_key: "key".to_string(),
        readonly,
    }
}

pub fn gateway_with(fake: &Arc<FakeOdoo>, config: &ServerConfig) -> Gateway {
    let transport: Arc<dyn Transport> = Arc::clone(fake) as Arc<dyn Transport>;
    let connection = SharedConnection::with_transport(
        &config.odoo_url,
        &config.database,
        &config.api_key,
        transport,
    );
    Gateway::with_connection(config, connection)
}

pub fn gateway(fake: &Arc<FakeOdoo>, readonly: bool) -> Gateway {
    gateway_with(fake, &test_config(readonly))
}

pub fn parse(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}
