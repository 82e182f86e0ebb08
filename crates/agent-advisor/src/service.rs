//! Answer generation

use crate::prompt::{render_system_prompt, system_template};
use crate::{AdvisorError, Result};
use agent_llm::{CompletionRequest, LLMProvider, Message};
use agent_prompt::JinjaTemplate;
use std::sync::Arc;
use tracing::{debug, instrument};

const TEMPERATURE: f32 = 0.5;
const TOP_P: f32 = 0.95;
const MAX_TOKENS: usize = 300;

/// Turns a question into an advisor answer with one chat completion
///
/// The service holds no per-request state; one instance serves every request.
pub struct AnswerService {
    provider: Arc<dyn LLMProvider>,
    model: String,
    template: JinjaTemplate,
}

impl AnswerService {
    /// Create the service
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            provider,
            model: model.into(),
            template: system_template()?,
        })
    }

    /// Answer one question
    ///
    /// The caller is responsible for rejecting empty questions. No retries.
    #[instrument(skip_all, fields(model = %self.model, question_length = question.len()))]
    pub async fn answer(&self, question: &str) -> Result<String> {
        let request = self.request(question)?;
        let response = self.provider.complete(request).await?;

        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Completion received"
        );

        let text = response
            .message
            .text()
            .ok_or(AdvisorError::EmptyCompletion)?;
        Ok(clean_answer(text))
    }

    fn request(&self, question: &str) -> Result<CompletionRequest> {
        let system_prompt = render_system_prompt(&self.template, question)?;

        Ok(CompletionRequest::builder(&self.model)
            .add_message(Message::system(system_prompt))
            .add_message(Message::user(question))
            .temperature(TEMPERATURE)
            .top_p(TOP_P)
            .frequency_penalty(0.0)
            .presence_penalty(0.0)
            .max_tokens(MAX_TOKENS)
            .build())
    }
}

/// Remove every `"` and trim surrounding whitespace
pub fn clean_answer(text: &str) -> String {
    text.replace('"', "").trim().to_string()
}
