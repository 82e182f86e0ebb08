//! LLM provider implementations

pub mod groq;

pub use groq::{DEFAULT_GROQ_API_BASE, GroqConfig, GroqProvider};
