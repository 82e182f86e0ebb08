//! Error types for the answer service

use thiserror::Error;

/// Result type for the answer service
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Errors raised by the answer service
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Configuration could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] agent_utils::ConfigError),

    /// The chat-completion call failed
    #[error("LLM error: {0}")]
    Llm(#[from] agent_llm::LLMError),

    /// The prompt could not be rendered
    #[error("Prompt error: {0}")]
    Prompt(#[from] agent_prompt::PromptError),

    /// The provider answered without any text
    #[error("Completion contained no text")]
    EmptyCompletion,
}
