use crate::error::GatewayError;

/// Port used when the address does not name one.
pub const DEFAULT_PORT: u16 = 8069;

/// Wire variant selected from the address scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireProtocol {
    /// JSON-RPC over plain HTTP.
    JsonRpc,
    /// JSON-RPC over HTTPS.
    JsonRpcSsl,
}

impl WireProtocol {
    pub fn scheme(self) -> &'static str {
        match self {
            Self::JsonRpc => "http",
            Self::JsonRpcSsl => "https",
        }
    }

    pub fn is_encrypted(self) -> bool {
        matches!(self, Self::JsonRpcSsl)
    }
}

/// Host, port and wire variant of an Odoo server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub protocol: WireProtocol,
}

impl Endpoint {
    /// Parse an endpoint address such as `https://erp.example.com` or
    /// `localhost:8069`.
    ///
    /// A missing scheme means plain HTTP; a missing port means 8069. Any path
    /// after the authority is not supported and fails as an invalid port.
    pub fn parse(address: &str) -> Result<Self, GatewayError> {
        let address = address.trim_end_matches('/');

        let (rest, protocol) = if let Some(rest) = address.strip_prefix("https://") {
            (rest, WireProtocol::JsonRpcSsl)
        } else if let Some(rest) = address.strip_prefix("http://") {
            (rest, WireProtocol::JsonRpc)
        } else {
            (address, WireProtocol::JsonRpc)
        };

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    GatewayError::Connectivity(format!("invalid port in address '{address}'"))
                })?;
                (host, port)
            }
            None => (rest, DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(GatewayError::Connectivity(format!(
                "missing host in address '{address}'"
            )));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            protocol,
        })
    }

    /// URL of the server's JSON-RPC entry point.
    pub fn rpc_url(&self) -> String {
        format!(
            "{}://{}:{}/jsonrpc",
            self.protocol.scheme(),
            self.host,
            self.port
        )
    }
}
