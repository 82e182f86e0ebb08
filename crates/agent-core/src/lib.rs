//! Core abstractions for agent-rs
//!
//! This crate defines the fundamental traits and types shared by the LLM,
//! runtime and workflow crates: the [`Agent`] trait, the per-run [`Context`]
//! and the common [`Error`] type.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
