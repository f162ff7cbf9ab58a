use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::OnceCell;

use super::endpoint::Endpoint;
use super::model::Model;
use super::transport::{JsonRpcTransport, Transport};
use crate::error::GatewayError;

/// Login used for API-key authentication; the key is the password.
pub const API_LOGIN: &str = "api";

/// An authenticated session with one Odoo database.
pub struct Connection {
    endpoint: Endpoint,
    database: String,
    credential: String,
    uid: i64,
    transport: Arc<dyn Transport>,
}

impl Connection {
    /// Parse `address`, open a JSON-RPC transport to it and log in.
    pub async fn connect(
        address: &str,
        database: &str,
        credential: &str,
    ) -> Result<Self, GatewayError> {
        let endpoint = Endpoint::parse(address)?;
        let transport = JsonRpcTransport::new(&endpoint)?;
        Self::authenticate(endpoint, database, credential, Arc::new(transport)).await
    }

    /// Log in over an existing transport.
    ///
    /// Any failure of the `common.login` handshake, including a remote fault,
    /// is reported as [`GatewayError::Connectivity`].
    pub async fn authenticate(
        endpoint: Endpoint,
        database: &str,
        credential: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, GatewayError> {
        let reply = transport
            .call(
                "common",
                "login",
                vec![json!(database), json!(API_LOGIN), json!(credential)],
            )
            .await
            .map_err(|err| match err {
                GatewayError::Connectivity(detail) => GatewayError::Connectivity(detail),
                other => GatewayError::Connectivity(format!("login failed: {other}")),
            })?;

        let uid = reply.as_i64().ok_or_else(|| {
            GatewayError::Connectivity(format!(
                "authentication refused for database '{database}'"
            ))
        })?;

        Ok(Self {
            endpoint,
            database: database.to_string(),
            credential: credential.to_string(),
            uid,
            transport,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// User id of the authenticated principal.
    pub fn uid(&self) -> i64 {
        self.uid
    }

    /// Proxy for one entity type.
    pub fn model<'a>(&'a self, name: &'a str) -> Model<'a> {
        Model::new(self, name)
    }

    /// `object.execute_kw` on `model`.
    pub(crate) async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Value, GatewayError> {
        self.transport
            .call(
                "object",
                "execute_kw",
                vec![
                    json!(self.database),
                    json!(self.uid),
                    json!(self.credential),
                    json!(model),
                    json!(method),
                    Value::Array(args),
                    Value::Object(kwargs),
                ],
            )
            .await
    }
}

/// The process-wide connection, established on first use.
///
/// Concurrent first callers wait on a single login. A failed login leaves
/// the cell empty so a later call can try again; an established connection
/// is never replaced, even after it stops answering.
pub struct SharedConnection {
    address: String,
    database: String,
    credential: String,
    transport: Option<Arc<dyn Transport>>,
    cell: OnceCell<Arc<Connection>>,
}

impl SharedConnection {
    pub fn new(
        address: impl Into<String>,
        database: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            database: database.into(),
            credential: credential.into(),
            transport: None,
            cell: OnceCell::new(),
        }
    }

    /// Like [`SharedConnection::new`], but logs in over `transport` instead
    /// of opening an HTTP transport to the address.
    pub fn with_transport(
        address: impl Into<String>,
        database: impl Into<String>,
        credential: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            transport: Some(transport),
            ..Self::new(address, database, credential)
        }
    }

    /// The established connection, logging in if this is the first use.
    pub async fn get(&self) -> Result<Arc<Connection>, GatewayError> {
        let connection = self
            .cell
            .get_or_try_init(|| async {
                let connection = self.establish().await?;
                eprintln!(
                    "Connected to {} (database '{}', uid {})",
                    connection.endpoint().rpc_url(),
                    connection.database(),
                    connection.uid()
                );
                Ok::<_, GatewayError>(Arc::new(connection))
            })
            .await?;
        Ok(Arc::clone(connection))
    }

    pub fn is_established(&self) -> bool {
        self.cell.initialized()
    }

    async fn establish(&self) -> Result<Connection, GatewayError> {
        match &self.transport {
            Some(transport) => {
                let endpoint = Endpoint::parse(&self.address)?;
                Connection::authenticate(
                    endpoint,
                    &self.database,
                    &self.credential,
                    Arc::clone(transport),
                )
                .await
            }
            None => Connection::connect(&self.address, &self.database, &self.credential).await,
        }
    }
}
