use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::endpoint::Endpoint;
use crate::error::GatewayError;

/// A channel to an Odoo server's external JSON-RPC services.
///
/// `service` is `common` or `object`; `method` and `args` are forwarded
/// as-is. Implementations must map a remote error reply to
/// [`GatewayError::RpcFault`] and a delivery failure to
/// [`GatewayError::Connectivity`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, GatewayError>;
}

/// `POST /jsonrpc` transport backed by `reqwest`.
pub struct JsonRpcTransport {
    url: String,
    client: Client,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    pub fn new(endpoint: &Endpoint) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::Connectivity(e.to_string()))?;
        Ok(Self {
            url: endpoint.rpc_url(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Serialize)]
struct RpcCall<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: RpcCallParams<'a>,
    id: u64,
}

#[derive(Debug, Serialize)]
struct RpcCallParams<'a> {
    service: &'a str,
    method: &'a str,
    args: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcReplyError>,
}

#[derive(Debug, Deserialize)]
struct RpcReplyError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<RpcFaultData>,
}

/// Odoo puts the user-facing exception text in `data.message` and the
/// server traceback in `data.debug`; only the former is kept.
#[derive(Debug, Deserialize)]
struct RpcFaultData {
    #[serde(default)]
    message: Option<String>,
}

impl RpcReplyError {
    fn into_fault(self) -> GatewayError {
        let text = self
            .data
            .and_then(|data| data.message)
            .filter(|message| !message.is_empty())
            .unwrap_or(self.message);
        GatewayError::RpcFault(text)
    }
}

#[async_trait]
impl Transport for JsonRpcTransport {
    async fn call(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, GatewayError> {
        let body = RpcCall {
            jsonrpc: "2.0",
            method: "call",
            params: RpcCallParams {
                service,
                method,
                args,
            },
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Connectivity(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Connectivity(format!(
                "{} answered with status {status}",
                self.url
            )));
        }

        let reply: RpcReply = response
            .json()
            .await
            .map_err(|e| GatewayError::Protocol(format!("malformed JSON-RPC reply: {e}")))?;

        match reply.error {
            Some(error) => Err(error.into_fault()),
            None => Ok(reply.result.unwrap_or(Value::Null)),
        }
    }
}
