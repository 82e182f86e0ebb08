//! Answer service configuration

use crate::Result;
use agent_llm::providers::{DEFAULT_GROQ_API_BASE, GroqConfig};
use agent_utils::{ServerSettings, require_var, var_or};

/// Model used when `ADVISOR_MODEL` is not set
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Address used when `ADVISOR_BIND` is not set
pub const DEFAULT_BIND: &str = "127.0.0.1:5010";

/// Configuration read once at start-up
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Groq API key
    pub api_key: String,
    /// Groq API base URL
    pub api_base: String,
    /// Chat model
    pub model: String,
    /// Bind address and CORS origin
    pub server: ServerSettings,
}

impl AdvisorConfig {
    /// Read the configuration from the environment
    ///
    /// `GROQ_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: require_var("GROQ_API_KEY")?,
            api_base: var_or("GROQ_API_BASE", DEFAULT_GROQ_API_BASE),
            model: var_or("ADVISOR_MODEL", DEFAULT_MODEL),
            server: ServerSettings::from_env("ADVISOR_BIND", DEFAULT_BIND)?,
        })
    }

    /// Provider configuration for the Groq client
    pub fn groq(&self) -> GroqConfig {
        GroqConfig::new(&self.api_key).with_api_base(&self.api_base)
    }
}
