//! Financial advisor answer service
//!
//! Answers a user's question with a single chat completion. The question is
//! wrapped in a fixed persona instruction and a fixed advisory context; the
//! reply comes back with quote characters removed.
//!
//! The HTTP surface lives in [`api`]; [`AnswerService`] can also be used on
//! its own.

pub mod api;
pub mod config;
pub mod error;
pub mod prompt;
pub mod service;

pub use api::{AppState, create_router};
pub use config::AdvisorConfig;
pub use error::{AdvisorError, Result};
pub use service::AnswerService;
