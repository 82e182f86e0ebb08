//! Tool registry for managing available tools

use crate::Tool;
use std::sync::Arc;
use tracing::warn;

/// Ordered set of tools available to one agent
///
/// Tools keep their registration order so the model always sees them listed
/// the same way. Registering a second tool under an existing name replaces
/// the first.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        if let Some(slot) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            warn!(tool = tool.name(), "Replacing already registered tool");
            *slot = tool;
        } else {
            self.tools.push(tool);
        }
    }

    /// Register a tool, builder style
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// List all registered tools in registration order
    pub fn list_tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Names of all registered tools
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Result;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct Echo {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl Tool for Echo {
        async fn execute(&self, _params: Value) -> Result<Value> {
            Ok(json!(self.reply))
        }

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "Echo a fixed reply"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }
    }

    fn echo(name: &'static str, reply: &'static str) -> Arc<dyn Tool> {
        Arc::new(Echo { name, reply })
    }

    #[test]
    fn test_registration_order() {
        let registry = ToolRegistry::new()
            .with_tool(echo("search_internet", "a"))
            .with_tool(echo("calculate", "b"))
            .with_tool(echo("search_news", "c"));

        assert_eq!(
            registry.names(),
            vec!["search_internet", "calculate", "search_news"]
        );
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_name_replaces() {
        let registry = ToolRegistry::new()
            .with_tool(echo("calculate", "old"))
            .with_tool(echo("calculate", "new"));

        assert_eq!(registry.len(), 1);
        let tool = registry.get("calculate").unwrap();
        assert_eq!(tool.execute(json!({})).await.unwrap(), json!("new"));
    }

    #[test]
    fn test_missing_tool() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("search_10k").is_none());
    }
}
