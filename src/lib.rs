//! MCP server for Odoo.
//!
//! Exposes an Odoo database as `list_models`, `get_fields`, `execute_method`,
//! `search_records`, `count_records`, `read_records`, `create_record`,
//! `update_record` and `delete_record` tools, plus `odoo://` resources, over
//! JSON-RPC 2.0 stdio transport.
//!
//! Calls reach Odoo through its external JSON-RPC API. Reads that do not
//! name their fields skip binary, image and html fields, and `READONLY_MODE`
//! blocks every write method before it leaves the process.

pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod odoo;
pub mod policy;
pub mod protocol;
pub mod server;
pub mod shape;

pub mod schema;
