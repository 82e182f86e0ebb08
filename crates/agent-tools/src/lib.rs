//! Tool framework
//!
//! Tools are the functions an LLM agent can call while working on a task.
//! Each agent owns its own [`ToolRegistry`]; registries are assembled once
//! when the agent is built and are read-only afterwards.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::Tool;
