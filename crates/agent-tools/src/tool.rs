//! The tool contract

use agent_core::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A capability an agent can invoke mid-conversation
///
/// The executor advertises `name`, `description` and `input_schema` to the
/// model, then calls [`Tool::execute`] with whatever arguments the model
/// produced. Arguments are not validated against the schema beforehand, so
/// implementations parse `params` themselves and reject bad input with an
/// error.
///
/// Returning `Err` does not abort the run. The error text goes back to the
/// model as a failed tool result and it may retry or answer without it.
#[async_trait]
pub trait Tool: Send + Sync {
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Name the model calls the tool by; unique within a registry
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the `params` object, e.g. built with `agent_llm::tools::schema`
    fn input_schema(&self) -> Value;
}
