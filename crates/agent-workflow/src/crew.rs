//! Crew definition

use crate::Task;
use agent_core::{Agent, Context, Error, Result};
use std::sync::Arc;

/// Agents plus the ordered tasks they work on
///
/// A `Crew` can only be obtained through [`CrewBuilder::build`], which
/// checks that there is at least one task and that every task's agent is a
/// member of the crew.
pub struct Crew {
    agents: Vec<Arc<dyn Agent>>,
    tasks: Vec<Task>,
    context: Context,
    verbose: bool,
}

impl Crew {
    /// Create a crew builder
    pub fn builder() -> CrewBuilder {
        CrewBuilder::default()
    }

    /// Crew members
    pub fn agents(&self) -> &[Arc<dyn Agent>] {
        &self.agents
    }

    /// Tasks in execution order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Context shared by every task of the run
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Whether task outputs are logged at info level
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

/// Builder for [`Crew`]
#[derive(Default)]
pub struct CrewBuilder {
    agents: Vec<Arc<dyn Agent>>,
    tasks: Vec<Task>,
    context: Context,
    verbose: bool,
}

impl CrewBuilder {
    /// Add a crew member
    pub fn agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agents.push(agent);
        self
    }

    /// Add a task; tasks run in the order they are added
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Set the run context (session id, company, ...)
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Log task outputs at info level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate and build the crew
    pub fn build(self) -> Result<Crew> {
        if self.tasks.is_empty() {
            return Err(Error::InvalidCrew("a crew needs at least one task".to_string()));
        }

        for task in &self.tasks {
            let agent_name = task.agent().name();
            if !self.agents.iter().any(|a| a.name() == agent_name) {
                return Err(Error::InvalidCrew(format!(
                    "task '{}' is assigned to '{agent_name}', which is not a crew member",
                    task.name()
                )));
            }
        }

        Ok(Crew {
            agents: self.agents,
            tasks: self.tasks,
            context: self.context,
            verbose: self.verbose,
        })
    }
}
