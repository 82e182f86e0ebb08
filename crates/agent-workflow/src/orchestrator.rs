//! Crew orchestration

use crate::{Crew, Task};
use agent_core::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Receives task lifecycle notifications during a run
///
/// Callbacks run inline on the orchestrating task and must not block.
pub trait CrewObserver: Send + Sync {
    /// A task is about to start
    fn on_task_start(&self, _index: usize, _task: &Task) {}

    /// A task finished successfully
    fn on_task_complete(&self, _index: usize, _task: &Task, _output: &str) {}

    /// A task failed; the run stops after this call
    fn on_task_failed(&self, _index: usize, _task: &Task, _error: &Error) {}
}

/// Observer that ignores every notification
pub struct NoopObserver;

impl CrewObserver for NoopObserver {}

/// Output of one task
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutput {
    /// Task name
    pub task: String,
    /// Name of the agent that produced the output
    pub agent: String,
    /// Raw output text
    pub output: String,
}

/// Result of a crew run
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    /// Output of the last task
    pub final_output: String,
    /// Outputs of every task, in execution order
    pub task_outputs: Vec<TaskOutput>,
}

/// Runs a crew to completion
///
/// Implementations either return the final output or fail as a whole; no
/// partial result is surfaced on failure.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Run every task of the crew
    async fn kickoff(&self, crew: Crew, observer: Arc<dyn CrewObserver>) -> Result<CrewOutput>;
}

/// Runs tasks one after another in declared order
///
/// Each task receives the outputs of all previous tasks as context. The
/// first failing task aborts the run with [`Error::TaskFailed`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialOrchestrator;

impl SequentialOrchestrator {
    /// Create a sequential orchestrator
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Orchestrator for SequentialOrchestrator {
    #[instrument(skip_all, fields(tasks = crew.tasks().len(), session_id = crew.context().session_id().unwrap_or("-")))]
    async fn kickoff(&self, crew: Crew, observer: Arc<dyn CrewObserver>) -> Result<CrewOutput> {
        let mut task_outputs: Vec<TaskOutput> = Vec::with_capacity(crew.tasks().len());

        for (index, task) in crew.tasks().iter().enumerate() {
            observer.on_task_start(index, task);
            info!(index, task = task.name(), agent = task.agent().name(), "Task started");

            let previous: Vec<String> = task_outputs.iter().map(|t| t.output.clone()).collect();
            let mut context = crew.context().clone().with_task(task.name());

            let output = match task.agent().process(task.prompt(&previous), &mut context).await {
                Ok(output) => output,
                Err(e) => {
                    error!(index, task = task.name(), error = %e, "Task failed");
                    observer.on_task_failed(index, task, &e);
                    return Err(Error::TaskFailed {
                        task: task.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            };

            if crew.verbose() {
                info!(index, task = task.name(), output = %output, "Task completed");
            } else {
                debug!(index, task = task.name(), output_length = output.len(), "Task completed");
            }
            observer.on_task_complete(index, task, &output);

            task_outputs.push(TaskOutput {
                task: task.name().to_string(),
                agent: task.agent().name().to_string(),
                output,
            });
        }

        let final_output = task_outputs
            .last()
            .map(|t| t.output.clone())
            .ok_or_else(|| Error::InvalidCrew("crew produced no output".to_string()))?;

        Ok(CrewOutput {
            final_output,
            task_outputs,
        })
    }
}
