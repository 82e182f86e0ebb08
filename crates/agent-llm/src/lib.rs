//! LLM provider abstraction layer for agent-rs
//!
//! This crate provides provider-agnostic abstractions for interacting with
//! chat-completion endpoints:
//!
//! - Message types for LLM communication
//! - Completion request/response types, including the sampling knobs
//!   (temperature, top-p, frequency/presence penalties)
//! - Tool definitions for function calling
//! - The [`LLMProvider`] trait
//! - A Groq provider speaking the OpenAI-compatible chat completions API
//!   (behind the `groq` feature)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod tools;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::LLMProvider;
pub use tools::ToolDefinition;

#[cfg(feature = "groq")]
pub mod providers;
