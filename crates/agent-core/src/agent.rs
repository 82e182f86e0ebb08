//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// Core trait that all agents must implement
///
/// An agent receives a fully rendered instruction and returns its final text
/// answer. Agents used by a crew are expected to be cheap to construct; the
/// stock analysis service builds a fresh set for every run.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    ///
    /// Crews use the name to check that every task is bound to one of
    /// their members, so it must be unique within a crew.
    fn name(&self) -> &str;
}
