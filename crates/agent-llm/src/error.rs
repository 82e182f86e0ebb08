//! Provider errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

/// Failure of a completion call
///
/// HTTP statuses returned by the provider map onto the specific variants;
/// anything else ends up in `RequestFailed` with the status and body.
#[derive(Error, Debug)]
pub enum LLMError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// 401 or 403
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// 429, carrying the provider's message
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Transport failure, including timeouts
    #[cfg(feature = "groq")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The body parsed but did not look like a chat completion
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Missing or invalid provider settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<LLMError> for agent_core::Error {
    fn from(err: LLMError) -> Self {
        agent_core::Error::ProcessingFailed(err.to_string())
    }
}
