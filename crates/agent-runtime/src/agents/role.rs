//! Role-based agent (wraps AgentExecutor)

use crate::executor::{AgentExecutor, ExecutorConfig};
use agent_core::{Agent, Context, Error, Result};
use agent_llm::LLMProvider;
use agent_prompt::JinjaTemplate;
use agent_tools::ToolRegistry;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

const SYSTEM_PROMPT: &str = "You are {{ role }}.
{{ backstory }}

Your personal goal is: {{ goal }}
{% if tools %}
You can use these tools when they help: {{ tools | join(\", \") }}.
Only call a tool when you need information you do not already have.
{% endif %}
When you are done, reply with your complete final answer as plain text.";

/// An agent described by a role, a goal and a backstory
///
/// The three descriptors are rendered into the system prompt of an
/// [`AgentExecutor`], which owns the agent's tools. The role doubles as the
/// agent's name.
///
/// # Example
///
/// ```no_run
/// use agent_runtime::RoleAgent;
/// # fn example(provider: std::sync::Arc<dyn agent_llm::LLMProvider>) -> agent_core::Result<()> {
/// let agent = RoleAgent::builder()
///     .role("Private Investment Advisor")
///     .goal("Impress your customers with full analyses over stocks")
///     .backstory("You're the most experienced investment advisor.")
///     .provider(provider)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct RoleAgent {
    role: String,
    goal: String,
    backstory: String,
    executor: AgentExecutor,
}

impl RoleAgent {
    /// Create a builder
    pub fn builder() -> RoleAgentBuilder {
        RoleAgentBuilder::default()
    }

    /// The agent's role
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The agent's goal
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// The agent's backstory
    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    /// Names of the tools bound to this agent
    pub fn tool_names(&self) -> Vec<&str> {
        self.executor.tools().names()
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }
}

impl std::fmt::Debug for RoleAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleAgent")
            .field("role", &self.role)
            .field("tools", &self.tool_names())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Agent for RoleAgent {
    #[instrument(skip_all, fields(agent = %self.role, task = context.task_name().unwrap_or("-")))]
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        info!(input_length = input.len(), "Agent started");
        let output = self.executor.run(input).await?;
        info!(output_length = output.len(), "Agent finished");
        Ok(output)
    }

    fn name(&self) -> &str {
        &self.role
    }
}

/// Builder for [`RoleAgent`]
#[derive(Default)]
pub struct RoleAgentBuilder {
    role: Option<String>,
    goal: Option<String>,
    backstory: Option<String>,
    provider: Option<Arc<dyn LLMProvider>>,
    tools: ToolRegistry,
    config: ExecutorConfig,
}

impl RoleAgentBuilder {
    /// Set the role
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the goal
    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    /// Set the backstory
    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = Some(backstory.into());
        self
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tools available to the agent
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// Set the executor configuration (its system prompt is replaced)
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<RoleAgent> {
        let missing = |field: &str| Error::InitializationFailed(format!("Agent {field} not set"));
        let role = self.role.ok_or_else(|| missing("role"))?;
        let goal = self.goal.ok_or_else(|| missing("goal"))?;
        let backstory = self.backstory.ok_or_else(|| missing("backstory"))?;
        let provider = self.provider.ok_or_else(|| missing("provider"))?;

        let system_prompt = JinjaTemplate::new("agent_system", SYSTEM_PROMPT)?.render(&json!({
            "role": role,
            "goal": goal,
            "backstory": backstory,
            "tools": self.tools.names(),
        }))?;

        let mut config = self.config;
        config.system_prompt = Some(system_prompt);

        Ok(RoleAgent {
            role,
            goal,
            backstory,
            executor: AgentExecutor::new(provider, self.tools, config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::tests::{ScriptedProvider, text_response};

    fn advisor(provider: Arc<ScriptedProvider>) -> RoleAgent {
        RoleAgent::builder()
            .role("Private Investment Advisor")
            .goal("Impress your customers")
            .backstory("You're the most experienced investment advisor.")
            .provider(provider)
            .build()
            .unwrap()
    }

    #[test]
    fn test_system_prompt_rendered() {
        let agent = advisor(Arc::new(ScriptedProvider::new(vec![])));
        let prompt = agent.executor().config().system_prompt.clone().unwrap();

        assert!(prompt.starts_with("You are Private Investment Advisor."));
        assert!(prompt.contains("Your personal goal is: Impress your customers"));
        assert!(!prompt.contains("You can use these tools"));
        assert_eq!(agent.name(), "Private Investment Advisor");
    }

    #[test]
    fn test_missing_role() {
        let result = RoleAgent::builder()
            .goal("g")
            .backstory("b")
            .provider(Arc::new(ScriptedProvider::new(vec![])))
            .build();
        assert!(matches!(result, Err(Error::InitializationFailed(_))));
    }

    #[tokio::test]
    async fn test_process_delegates_to_executor() {
        let provider = Arc::new(ScriptedProvider::new(vec![text_response("HOLD")]));
        let agent = advisor(provider.clone());

        let mut context = Context::new().with_task("recommend");
        let output = agent
            .process("Give a recommendation".to_string(), &mut context)
            .await
            .unwrap();

        assert_eq!(output, "HOLD");
        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].messages[0].text(), Some("Give a recommendation"));
    }
}
