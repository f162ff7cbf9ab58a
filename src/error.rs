use thiserror::Error;

use crate::odoo::DomainError;

/// Remediation text attached to every write-policy rejection.
pub const READONLY_REMEDIATION: &str = "Set READONLY_MODE=false to enable write operations.";

/// Failures raised by the gateway between a tool call and the Odoo server.
///
/// None of the variants are retried internally.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The endpoint address could not be parsed, the transport failed, or
    /// the login handshake was refused.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// The Odoo server rejected the call. Carries the remote error text.
    #[error("{0}")]
    RpcFault(String),

    /// The write-policy guard blocked a mutating operation.
    #[error("Operation '{operation}' is not allowed in READONLY_MODE. {}", READONLY_REMEDIATION)]
    Policy { operation: String },

    /// The server answered with a payload of an unexpected shape.
    #[error("unexpected response: {0}")]
    Protocol(String),

    /// A domain built by the gateway failed its structural check.
    #[error("invalid domain: {0}")]
    InvalidDomain(#[from] DomainError),

    #[error("encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn policy(operation: impl Into<String>) -> Self {
        Self::Policy {
            operation: operation.into(),
        }
    }
}
