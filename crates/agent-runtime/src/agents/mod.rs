//! Concrete agent implementations

pub mod role;

pub use role::{RoleAgent, RoleAgentBuilder};
