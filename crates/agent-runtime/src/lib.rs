//! Agent runtime
//!
//! This crate provides the [`AgentExecutor`], which drives the
//! LLM → tool calls → tool results → LLM loop, and [`RoleAgent`], an
//! [`agent_core::Agent`] described by a role, a goal and a backstory.

pub mod agents;
pub mod executor;

pub use agents::{RoleAgent, RoleAgentBuilder};
pub use executor::{AgentExecutor, AgentExecutorBuilder, ExecutorConfig};
