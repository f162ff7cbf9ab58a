use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::odoo::Endpoint;

pub const DEFAULT_ODOO_URL: &str = "http://localhost:8019";
pub const DEFAULT_DATABASE: &str = "your_database_key_here";
pub const DEFAULT_API_KEY: &str = "your_api_key_here";

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct ServerConfig {
    pub odoo_url: String,
    pub database: String,
    pub api_key: String,
    pub readonly: bool,
}

impl ServerConfig {
    /// Load configuration from environment, falling back to a `.env` file
    /// in the working directory or one of its parents.
    ///
    /// - `ODOO_URL` (optional, default `http://localhost:8019`) — server address
    /// - `ODOO_DATABASE` (optional) — database name
    /// - `ODOO_API_KEY` (optional) — API key used as the login password
    /// - `READONLY_MODE` (optional, default false) — `true` blocks write methods
    ///
    /// A variable set in the process environment wins over the same one in
    /// `.env`. A missing `.env` is not an error.
    pub fn from_env() -> Result<Self, String> {
        let file = match dotenvy::dotenv_iter() {
            Ok(iter) => collect_dotenv(iter)?,
            Err(e) if e.not_found() => HashMap::new(),
            Err(e) => return Err(format!(".env could not be read: {e}")),
        };
        Self::from_layers(|key| std::env::var(key).ok(), &file)
    }

    /// Load configuration from `env`, then from `file` for variables `env`
    /// does not set.
    pub fn from_layers(
        env: impl Fn(&str) -> Option<String>,
        file: &HashMap<String, String>,
    ) -> Result<Self, String> {
        Self::from_lookup(|key| env(key).or_else(|| file.get(key).cloned()))
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// The address is parsed here so a malformed `ODOO_URL` is reported at
    /// startup; no connection is attempted.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let odoo_url = lookup("ODOO_URL").unwrap_or_else(|| DEFAULT_ODOO_URL.to_string());
        Endpoint::parse(&odoo_url).map_err(|e| format!("ODOO_URL is invalid: {e}"))?;

        let database = lookup("ODOO_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let api_key = lookup("ODOO_API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.to_string());
        let readonly = lookup("READONLY_MODE")
            .map(|val| val.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            odoo_url,
            database,
            api_key,
            readonly,
        })
    }
}

/// Variables of the dotenv file at `path`, without touching the process
/// environment.
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, String> {
    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| format!("{} could not be read: {e}", path.display()))?;
    collect_dotenv(iter)
}

fn collect_dotenv<R: std::io::Read>(
    iter: dotenvy::Iter<R>,
) -> Result<HashMap<String, String>, String> {
    iter.collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| format!(".env is malformed: {e}"))
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("odoo_url", &self.odoo_url)
            .field("database", &self.database)
            .field("api_key", &"<redacted>")
            .field("readonly", &self.readonly)
            .finish()
    }
}
