//! Multi-agent orchestration
//!
//! A [`Crew`] bundles agents with an ordered list of [`Task`]s. An
//! [`Orchestrator`] runs the crew and returns a [`CrewOutput`]; a
//! [`CrewObserver`] is told when each task starts and ends.
//!
//! [`SequentialOrchestrator`] runs tasks one after another, handing the
//! outputs of earlier tasks to later ones as context.

pub mod crew;
pub mod orchestrator;
pub mod task;

pub use crew::{Crew, CrewBuilder};
pub use orchestrator::{
    CrewObserver, CrewOutput, NoopObserver, Orchestrator, SequentialOrchestrator, TaskOutput,
};
pub use task::{Task, TaskBuilder};
