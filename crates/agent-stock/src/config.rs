//! Configuration for the analysis service

use crate::error::{Result, StockError};
use agent_llm::providers::{DEFAULT_GROQ_API_BASE, GroqConfig};
use agent_utils::{ServerSettings, require_var, var_or, var_parse};
use std::net::SocketAddr;
use std::time::Duration;

/// Model used when `STOCK_MODEL` is not set
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Address used when `STOCK_BIND` is not set
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// User agent sent to SEC EDGAR when `SEC_USER_AGENT` is not set
pub const DEFAULT_SEC_USER_AGENT: &str = "agent-stock research@example.com";

/// Configuration for the analysis service
///
/// Built once at start-up and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct StockConfig {
    /// Groq API key
    pub api_key: String,

    /// Groq API base URL
    pub api_base: String,

    /// Chat model used by every agent
    pub model: String,

    /// Bind address and CORS origin
    pub server: ServerSettings,

    /// Serper API key for the search tools (optional)
    pub serper_api_key: Option<String>,

    /// User agent for SEC EDGAR (must identify the caller)
    pub sec_user_agent: String,

    /// Tool-loop iterations allowed per task
    pub max_iterations: usize,

    /// Timeout applied to tool HTTP calls (search, SEC, scraping)
    pub request_timeout: Duration,
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Read the configuration from the environment
    ///
    /// `GROQ_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder()
            .api_key(require_var("GROQ_API_KEY")?)
            .api_base(var_or("GROQ_API_BASE", DEFAULT_GROQ_API_BASE))
            .model(var_or("STOCK_MODEL", DEFAULT_MODEL))
            .server(ServerSettings::from_env("STOCK_BIND", DEFAULT_BIND)?)
            .sec_user_agent(var_or("SEC_USER_AGENT", DEFAULT_SEC_USER_AGENT))
            .max_iterations(var_parse("STOCK_MAX_ITERATIONS", 15)?)
            .request_timeout(Duration::from_secs(var_parse(
                "STOCK_REQUEST_TIMEOUT_SECS",
                30,
            )?));

        if let Ok(key) = require_var("SERPER_API_KEY") {
            builder = builder.serper_api_key(key);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(StockError::ConfigError("GROQ_API_KEY must not be empty".to_string()));
        }

        if self.max_iterations == 0 {
            return Err(StockError::ConfigError(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Override the bind address
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.server = self.server.with_bind_addr(bind_addr);
        self
    }

    /// Provider configuration for the Groq client
    pub fn groq(&self) -> GroqConfig {
        GroqConfig::new(&self.api_key).with_api_base(&self.api_base)
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    api_key: Option<String>,
    api_base: Option<String>,
    model: Option<String>,
    server: Option<ServerSettings>,
    serper_api_key: Option<String>,
    sec_user_agent: Option<String>,
    max_iterations: Option<usize>,
    request_timeout: Option<Duration>,
}

impl StockConfigBuilder {
    /// Set the Groq API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the Groq API base URL
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the server settings
    pub fn server(mut self, server: ServerSettings) -> Self {
        self.server = Some(server);
        self
    }

    /// Set the Serper API key
    pub fn serper_api_key(mut self, key: impl Into<String>) -> Self {
        self.serper_api_key = Some(key.into());
        self
    }

    /// Set the SEC user agent
    pub fn sec_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.sec_user_agent = Some(user_agent.into());
        self
    }

    /// Set the tool-loop iteration bound
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Set the outbound request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let server = match self.server {
            Some(server) => server,
            None => ServerSettings {
                bind_addr: DEFAULT_BIND.parse().map_err(|e: std::net::AddrParseError| {
                    StockError::ConfigError(e.to_string())
                })?,
                cors_origin: agent_utils::config::DEFAULT_CORS_ORIGIN.to_string(),
            },
        };

        let config = StockConfig {
            api_key: self.api_key.unwrap_or_default(),
            api_base: self
                .api_base
                .unwrap_or_else(|| DEFAULT_GROQ_API_BASE.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            server,
            serper_api_key: self.serper_api_key.filter(|k| !k.trim().is_empty()),
            sec_user_agent: self
                .sec_user_agent
                .unwrap_or_else(|| DEFAULT_SEC_USER_AGENT.to_string()),
            max_iterations: self.max_iterations.unwrap_or(15),
            request_timeout: self.request_timeout.unwrap_or(Duration::from_secs(30)),
        };

        config.validate()?;
        Ok(config)
    }
}
