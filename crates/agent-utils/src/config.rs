//! Environment configuration helpers
//!
//! Services read their configuration once at start-up. Values come from the
//! process environment, optionally seeded from a `.env` file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Default front-end origin allowed by CORS
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Errors raised while reading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank
    #[error("{0} environment variable not set")]
    Missing(String),

    /// A variable is set but does not parse
    #[error("Invalid value for {name}: {detail}")]
    Invalid { name: String, detail: String },
}

/// Load `.env` from the working directory if present, returning its path
///
/// Runs before the subscriber exists so `.env` can set `RUST_LOG`; callers
/// log the outcome once tracing is up.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

/// Read a variable that must be present and non-blank
pub fn require_var(name: &str) -> Result<String, ConfigError> {
    dotenv::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing(name.to_string()))
}

/// Read a variable, falling back to `default` when unset or blank
pub fn var_or(name: &str, default: &str) -> String {
    dotenv::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Read and parse a variable, falling back to `default` when unset
pub fn var_parse<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match dotenv::var(name).ok().filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name: name.to_string(),
            detail: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Listening address and CORS origin shared by both services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Socket address to bind
    pub bind_addr: SocketAddr,
    /// Single origin allowed by CORS
    pub cors_origin: String,
}

impl ServerSettings {
    /// Read `bind_var` (default `default_bind`) and `CORS_ORIGIN`
    pub fn from_env(bind_var: &str, default_bind: &str) -> Result<Self, ConfigError> {
        let raw = var_or(bind_var, default_bind);
        let bind_addr = raw.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                name: bind_var.to_string(),
                detail: e.to_string(),
            }
        })?;

        Ok(Self {
            bind_addr,
            cors_origin: var_or("CORS_ORIGIN", DEFAULT_CORS_ORIGIN),
        })
    }

    /// Override the bind address
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }
}
