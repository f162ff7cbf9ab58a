//! Client for Odoo's external JSON-RPC API.

pub mod connection;
pub mod domain;
pub mod endpoint;
pub mod fields;
pub mod model;
pub mod transport;

pub use connection::{Connection, SharedConnection, API_LOGIN};
pub use domain::{Domain, DomainError, DomainTerm};
pub use endpoint::{Endpoint, WireProtocol, DEFAULT_PORT};
pub use fields::{
    plan_read, safe_fields, FieldDescriptor, ReadPlan, TemporalFields, TemporalKind, DANGEROUS_FIELD_TYPES,
    DEFAULT_FIELD_ATTRIBUTES,
};
pub use model::{CreateValues, CreatedIds, FieldMap, Model, ReadOptions, Record, DEFAULT_LIMIT};
pub use transport::{JsonRpcTransport, Transport};
