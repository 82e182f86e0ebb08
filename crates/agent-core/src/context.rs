//! Execution context for agents
//!
//! The `Context` struct is a small key-value store carried through one agent
//! invocation. The crew orchestrator fills it with the run's correlation id
//! and the task being executed so that agents and tools can log against them.

use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Correlation id of the run (used to scope progress delivery)
    pub const SESSION_ID: &str = "session_id";
    /// Company identifier the run is about
    pub const COMPANY: &str = "company";
    /// Name of the task currently executing
    pub const TASK_NAME: &str = "task_name";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let ctx = Context::new()
///     .with_session_id("session-123")
///     .with_company("AAPL");
///
/// assert_eq!(ctx.session_id(), Some("session-123"));
/// assert_eq!(ctx.company(), Some("AAPL"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.insert(keys::SESSION_ID, serde_json::json!(session_id.into()));
        self
    }

    /// Set the company identifier
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.insert(keys::COMPANY, serde_json::json!(company.into()));
        self
    }

    /// Set the task currently executing
    pub fn with_task(mut self, task_name: impl Into<String>) -> Self {
        self.insert(keys::TASK_NAME, serde_json::json!(task_name.into()));
        self
    }

    /// Get the session ID
    pub fn session_id(&self) -> Option<&str> {
        self.get_str(keys::SESSION_ID)
    }

    /// Get the company identifier
    pub fn company(&self) -> Option<&str> {
        self.get_str(keys::COMPANY)
    }

    /// Get the name of the executing task
    pub fn task_name(&self) -> Option<&str> {
        self.get_str(keys::TASK_NAME)
    }

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }
}
