//! Shared utilities
//!
//! Logging setup, environment-driven configuration helpers and the shutdown
//! signal used by both service binaries.

pub mod config;
pub mod logging;
pub mod shutdown;

pub use config::{ConfigError, ServerSettings, load_dotenv, require_var, var_or, var_parse};
pub use logging::init_tracing;
pub use shutdown::shutdown_signal;
