//! Prompt templates
//!
//! Prompts are MiniJinja templates rendered with a `serde_json::Value`
//! holding the variables. Rendering is strict: a variable the template uses
//! but the caller did not supply is an error, not an empty string.
//!
//! # Quick Start
//!
//! ```
//! use agent_prompt::JinjaTemplate;
//! use serde_json::json;
//!
//! let template = JinjaTemplate::new("research", "Collect news about {{ company }}.").unwrap();
//! let prompt = template.render(&json!({ "company": "TSLA" })).unwrap();
//! assert_eq!(prompt, "Collect news about TSLA.");
//! ```

mod error;
mod jinja;

pub use error::{PromptError, Result};
pub use jinja::JinjaTemplate;
