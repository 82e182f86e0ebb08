//! Agent executor for running agent loops
//!
//! The AgentExecutor implements the core agent loop pattern:
//! 1. Call LLM with conversation history and available tools
//! 2. If tool use requested, execute tools, append results and loop back
//! 3. Otherwise return the assistant's text
//!
//! The loop is bounded by `max_iterations`. When the bound is reached the
//! executor makes one last call without tools, asking the model for its
//! final answer based on what it has gathered.

use agent_core::{Error, Result};
use agent_llm::{CompletionRequest, ContentBlock, LLMProvider, Message, StopReason, ToolDefinition};
use agent_tools::ToolRegistry;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const FINAL_ANSWER_PROMPT: &str = "You have reached the maximum number of tool uses. \
Do not call any more tools. Using only the information gathered so far, \
give your best complete final answer now.";

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of tool-loop iterations (prevents infinite loops)
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 15,
            model: "llama3-70b-8192".to_string(),
            system_prompt: None,
            max_tokens: 2048,
            temperature: Some(0.7),
        }
    }
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tools: ToolRegistry,
    config: ExecutorConfig,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(provider: Arc<dyn LLMProvider>, tools: ToolRegistry, config: ExecutorConfig) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create a builder
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    /// Executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Tools available to the loop
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Execute the agent loop with a user query
    ///
    /// Returns the final response after all tool calls are complete.
    pub async fn run(&self, user_message: String) -> Result<String> {
        let mut conversation = vec![Message::user(user_message)];
        let definitions = self.tool_definitions();

        for iteration in 1..=self.config.max_iterations {
            debug!(
                iteration,
                max_iterations = self.config.max_iterations,
                "Agent iteration started"
            );

            let response = self
                .provider
                .complete(self.request(&conversation, Some(definitions.as_slice())))
                .await?;

            info!(
                iteration,
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                total_tokens = response.usage.total(),
                "LLM response received"
            );

            let message = response.message;
            if message.has_tool_uses() {
                let results = self.execute_tools(&message).await;
                conversation.push(message);
                conversation.extend(results);
                continue;
            }

            if response.stop_reason == StopReason::MaxTokens {
                warn!(iteration, "Response truncated by token limit");
            }
            return final_text(&message);
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "Max iterations reached, requesting final answer"
        );
        conversation.push(Message::user(FINAL_ANSWER_PROMPT));
        let response = self.provider.complete(self.request(&conversation, None)).await?;
        final_text(&response.message)
    }

    fn request(
        &self,
        conversation: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> CompletionRequest {
        let mut builder = CompletionRequest::builder(&self.config.model)
            .messages(conversation.to_vec())
            .max_tokens(self.config.max_tokens);

        if let Some(system) = &self.config.system_prompt {
            builder = builder.system(system.clone());
        }
        if let Some(temperature) = self.config.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            builder = builder.tools(tools.to_vec());
        }

        builder.build()
    }

    /// Build tool definitions from the registry
    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .list_tools()
            .iter()
            .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }

    /// Execute every tool call of an assistant message.
    ///
    /// Failures, including calls to tools that do not exist, become error
    /// tool results so the model can correct itself.
    async fn execute_tools(&self, message: &Message) -> Vec<Message> {
        let mut results = Vec::new();

        for block in message.tool_uses() {
            let ContentBlock::ToolUse { id, name, input } = block else {
                continue;
            };

            let Some(tool) = self.tools.get(name) else {
                warn!(tool_name = %name, "Model called an unknown tool");
                results.push(Message::tool_error(
                    id.clone(),
                    format!(
                        "Error: tool '{name}' does not exist. Available tools: {}",
                        self.tools.names().join(", ")
                    ),
                ));
                continue;
            };

            let input_preview: String = input.to_string().chars().take(200).collect();
            info!(tool_name = %name, tool_id = %id, input_preview = %input_preview, "Executing tool");

            let started = Instant::now();
            match tool.execute(input.clone()).await {
                Ok(value) => {
                    let output = tool_output(value);
                    info!(
                        tool_name = %name,
                        duration_ms = started.elapsed().as_millis() as u64,
                        result_length = output.len(),
                        "Tool execution succeeded"
                    );
                    results.push(Message::tool_result(id.clone(), output));
                }
                Err(e) => {
                    warn!(
                        tool_name = %name,
                        duration_ms = started.elapsed().as_millis() as u64,
                        error = %e,
                        "Tool execution failed"
                    );
                    results.push(Message::tool_error(id.clone(), format!("Error: {e}")));
                }
            }
        }

        results
    }
}

fn tool_output(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn final_text(message: &Message) -> Result<String> {
    match message.text().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(Error::ProcessingFailed(
            "Model returned an empty response".to_string(),
        )),
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tools: ToolRegistry,
    config: ExecutorConfig,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: ExecutorConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        Ok(AgentExecutor::new(provider, self.tools, self.config))
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
