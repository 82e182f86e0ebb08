//! MiniJinja-based template implementation

use crate::{PromptError, Result};
use minijinja::{Environment, UndefinedBehavior, Value};

/// A named prompt template backed by MiniJinja
///
/// The source is validated when the template is created, so a
/// `JinjaTemplate` that exists can only fail to render on bad variables.
///
/// # Template Syntax
///
/// - Variables: `{{ variable }}`
/// - Filters: `{{ name | upper }}`
/// - Conditionals: `{% if condition %}...{% endif %}`
/// - Loops: `{% for item in items %}...{% endfor %}`
#[derive(Debug, Clone)]
pub struct JinjaTemplate {
    name: String,
    source: String,
}

impl JinjaTemplate {
    /// Create a template, validating its syntax
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();

        let env = Environment::new();
        env.template_from_str(&source)
            .map_err(|e| PromptError::TemplateParseFailed {
                name: name.clone(),
                detail: e.to_string(),
            })?;

        Ok(Self { name, source })
    }

    /// Template name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given variables
    pub fn render(&self, vars: &serde_json::Value) -> Result<String> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        // Prompts keep their trailing newline as written
        env.set_keep_trailing_newline(true);

        env.render_str(&self.source, Value::from_serialize(vars))
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }
}
