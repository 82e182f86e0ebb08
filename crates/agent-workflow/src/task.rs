//! Task definition

use agent_core::{Agent, Error, Result};
use std::sync::Arc;

/// One unit of work assigned to an agent
///
/// The description is final text; any templating happens before the task
/// is built.
#[derive(Clone)]
pub struct Task {
    name: String,
    description: String,
    expected_output: String,
    agent: Arc<dyn Agent>,
}

impl Task {
    /// Create a task builder
    pub fn builder(name: impl Into<String>) -> TaskBuilder {
        TaskBuilder::new(name)
    }

    /// Task name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Task description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// What the final answer must contain
    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    /// Agent bound to this task
    pub fn agent(&self) -> &Arc<dyn Agent> {
        &self.agent
    }

    /// Build the prompt handed to the agent
    ///
    /// `context` holds the outputs of the tasks that ran before this one.
    pub fn prompt(&self, context: &[String]) -> String {
        let mut prompt = format!(
            "{}\n\nThis is the expected criteria for your final answer: {}\n\
             You MUST return the actual complete content as the final answer, not a summary.",
            self.description, self.expected_output
        );

        if !context.is_empty() {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(&context.join("\n\n----------\n\n"));
        }

        prompt
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("agent", &self.agent.name())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Task`]
pub struct TaskBuilder {
    name: String,
    description: Option<String>,
    expected_output: Option<String>,
    agent: Option<Arc<dyn Agent>>,
}

impl TaskBuilder {
    /// Create a builder for the named task
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            expected_output: None,
            agent: None,
        }
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the expected output
    pub fn expected_output(mut self, expected_output: impl Into<String>) -> Self {
        self.expected_output = Some(expected_output.into());
        self
    }

    /// Bind the agent
    pub fn agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Build the task
    pub fn build(self) -> Result<Task> {
        let description = self
            .description
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| {
                Error::InitializationFailed(format!("Task '{}' has no description", self.name))
            })?;
        let agent = self.agent.ok_or_else(|| {
            Error::InitializationFailed(format!("Task '{}' has no agent", self.name))
        })?;

        Ok(Task {
            name: self.name,
            description,
            expected_output: self
                .expected_output
                .unwrap_or_else(|| "A complete and accurate answer.".to_string()),
            agent,
        })
    }
}
