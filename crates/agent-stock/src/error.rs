//! Error types for stock analysis operations

use thiserror::Error;

/// Stock analysis specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Invalid tool input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// LLM call made by a tool failed
    #[error("LLM error: {0}")]
    LlmError(#[from] agent_llm::LLMError),

    /// Prompt rendering failed
    #[error("Prompt error: {0}")]
    PromptError(#[from] agent_prompt::PromptError),

    /// Agent construction or crew run failed; the message is passed through unchanged
    #[error(transparent)]
    Crew(#[from] agent_core::Error),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

/// Convert StockError to agent_core::Error
impl From<StockError> for agent_core::Error {
    fn from(err: StockError) -> Self {
        match err {
            StockError::Crew(inner) => inner,
            other => agent_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

impl From<agent_utils::ConfigError> for StockError {
    fn from(err: agent_utils::ConfigError) -> Self {
        StockError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::InvalidSymbol("ZZZZ".to_string());
        assert_eq!(err.to_string(), "Invalid symbol: ZZZZ");

        let err = StockError::InvalidInput("both ticker and question are required".to_string());
        assert_eq!(err.to_string(), "Invalid input: both ticker and question are required");
    }

    #[test]
    fn test_crew_error_is_transparent() {
        let err: StockError = agent_core::Error::TaskFailed {
            task: "recommend".to_string(),
            reason: "timeout".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Task 'recommend' failed: timeout");

        let back: agent_core::Error = err.into();
        assert!(matches!(back, agent_core::Error::TaskFailed { .. }));
    }

    #[test]
    fn test_error_conversion() {
        let agent_err: agent_core::Error = StockError::ApiError("Serper 403".to_string()).into();

        match agent_err {
            agent_core::Error::ProcessingFailed(msg) => assert!(msg.contains("API error")),
            _ => panic!("Expected ProcessingFailed variant"),
        }
    }
}
