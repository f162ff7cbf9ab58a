use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::connection::Connection;
use super::domain::Domain;
use super::fields::FieldDescriptor;
use crate::error::GatewayError;

/// Default page size for `search` and `search_read`.
pub const DEFAULT_LIMIT: u32 = 100;

/// One record as returned by the server, keys in server order.
pub type Record = Map<String, Value>;

/// Field name to descriptor, as returned by `fields_get`.
pub type FieldMap = BTreeMap<String, FieldDescriptor>;

/// Input of `create`: one value mapping or a batch of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreateValues {
    Single(Map<String, Value>),
    Batch(Vec<Map<String, Value>>),
}

impl CreateValues {
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }
}

/// Result of `create`: the server returns an id for a mapping and a list of
/// ids for a batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CreatedIds {
    One(i64),
    Many(Vec<i64>),
}

impl CreatedIds {
    pub fn into_vec(self) -> Vec<i64> {
        match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }
}

/// Paging, projection and ordering of `search_read`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// `None` or empty reads every field.
    pub fields: Option<Vec<String>>,
    pub limit: u32,
    pub offset: u32,
    /// Passed verbatim, e.g. `"create_date desc"`.
    pub order: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            fields: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            order: None,
        }
    }
}

/// Call surface of one remote entity type.
///
/// Every method is a single `execute_kw` round trip: no retries, no caching,
/// no validation of domains or values.
pub struct Model<'a> {
    connection: &'a Connection,
    name: &'a str,
}

impl<'a> Model<'a> {
    pub(crate) fn new(connection: &'a Connection, name: &'a str) -> Self {
        Self { connection, name }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub async fn search(
        &self,
        domain: &Domain,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<i64>, GatewayError> {
        let mut kwargs = Map::new();
        kwargs.insert("limit".into(), json!(limit));
        kwargs.insert("offset".into(), json!(offset));
        let reply = self.invoke("search", vec![domain.to_value()], kwargs).await?;
        decode("search", reply)
    }

    pub async fn search_count(&self, domain: &Domain) -> Result<i64, GatewayError> {
        let reply = self
            .invoke("search_count", vec![domain.to_value()], Map::new())
            .await?;
        decode("search_count", reply)
    }

    /// Read `ids`. Ids that do not exist are absent from the result.
    pub async fn read(
        &self,
        ids: &[i64],
        fields: Option<&[String]>,
    ) -> Result<Vec<Record>, GatewayError> {
        let mut args = vec![json!(ids)];
        if let Some(fields) = fields.filter(|f| !f.is_empty()) {
            args.push(json!(fields));
        }
        let reply = self.invoke("read", args, Map::new()).await?;
        decode("read", reply)
    }

    pub async fn search_read(
        &self,
        domain: &Domain,
        options: &ReadOptions,
    ) -> Result<Vec<Record>, GatewayError> {
        let mut kwargs = Map::new();
        kwargs.insert("limit".into(), json!(options.limit));
        kwargs.insert("offset".into(), json!(options.offset));
        if let Some(fields) = options.fields.as_ref().filter(|f| !f.is_empty()) {
            kwargs.insert("fields".into(), json!(fields));
        }
        if let Some(order) = options.order.as_ref().filter(|o| !o.is_empty()) {
            kwargs.insert("order".into(), json!(order));
        }
        let reply = self
            .invoke("search_read", vec![domain.to_value()], kwargs)
            .await?;
        decode("search_read", reply)
    }

    pub async fn create(&self, values: &CreateValues) -> Result<CreatedIds, GatewayError> {
        let reply = self
            .invoke("create", vec![serde_json::to_value(values)?], Map::new())
            .await?;
        decode("create", reply)
    }

    pub async fn write(
        &self,
        ids: &[i64],
        values: &Map<String, Value>,
    ) -> Result<bool, GatewayError> {
        let reply = self
            .invoke("write", vec![json!(ids), Value::Object(values.clone())], Map::new())
            .await?;
        decode("write", reply)
    }

    pub async fn unlink(&self, ids: &[i64]) -> Result<bool, GatewayError> {
        let reply = self.invoke("unlink", vec![json!(ids)], Map::new()).await?;
        decode("unlink", reply)
    }

    /// Field metadata. `None` or empty lists mean all fields / all
    /// attributes.
    pub async fn fields_get(
        &self,
        field_names: Option<&[String]>,
        attributes: Option<&[String]>,
    ) -> Result<FieldMap, GatewayError> {
        let mut kwargs = Map::new();
        if let Some(names) = field_names.filter(|n| !n.is_empty()) {
            kwargs.insert("allfields".into(), json!(names));
        }
        if let Some(attributes) = attributes.filter(|a| !a.is_empty()) {
            kwargs.insert("attributes".into(), json!(attributes));
        }
        let reply = self.invoke("fields_get", Vec::new(), kwargs).await?;
        decode("fields_get", reply)
    }

    /// Call any method of the model. The signature is the server's business.
    pub async fn invoke(
        &self,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Value, GatewayError> {
        self.connection
            .execute_kw(self.name, method, args, kwargs)
            .await
    }
}

fn decode<T: DeserializeOwned>(method: &str, reply: Value) -> Result<T, GatewayError> {
    serde_json::from_value(reply).map_err(|e| {
        GatewayError::Protocol(format!("{method} returned an unexpected payload: {e}"))
    })
}
