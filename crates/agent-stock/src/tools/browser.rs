//! Website scraping tool
//!
//! Pages are converted to text, split into chunks and each chunk is
//! summarized by the model before being handed back to the agent.

use super::parse_params;
use crate::error::{Result, StockError};
use crate::text::{chunk_text, render_html};
use agent_core::Result as AgentResult;
use agent_llm::tools::schema;
use agent_llm::{CompletionRequest, LLMProvider, Message};
use agent_tools::Tool;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

const CHUNK_CHARS: usize = 8000;

/// Chunks summarized per page; the rest of a very long page is dropped
const MAX_CHUNKS: usize = 12;

const SUMMARIZER_ROLE: &str = "You are a Principal Researcher. \
You do amazing research and summaries based on the content you are working with.";

const SUMMARY_PROMPT: &str = "Analyze and summarize the content below, make sure to include \
the most relevant information in the summary, return only the summary nothing else.\n\nCONTENT\n----------\n";

#[derive(Debug, Deserialize)]
struct ScrapeParams {
    website: String,
}

/// Parse and check a URL given by the model
pub fn parse_website(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let url = Url::parse(raw)
        .or_else(|_| Url::parse(&format!("https://{raw}")))
        .map_err(|e| StockError::InvalidInput(format!("invalid URL '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(StockError::InvalidInput(format!("unsupported URL scheme '{other}'"))),
    }
}

/// Fetches a page and returns a model-written summary of it
#[derive(Clone)]
pub struct ScrapeWebsiteTool {
    client: Client,
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl ScrapeWebsiteTool {
    pub fn new(client: Client, provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            client,
            provider,
            model: model.into(),
        }
    }

    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(StockError::ApiError(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        let body = response.bytes().await?;
        render_html(body).await
    }

    /// Summarize page text chunk by chunk, joining the summaries
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let mut chunks = chunk_text(text, CHUNK_CHARS);
        if chunks.len() > MAX_CHUNKS {
            warn!(chunks = chunks.len(), kept = MAX_CHUNKS, "Page too long, truncating");
            chunks.truncate(MAX_CHUNKS);
        }

        let mut summaries = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            debug!(chunk = index, chars = chunk.len(), "Summarizing chunk");

            let request = CompletionRequest::builder(&self.model)
                .system(SUMMARIZER_ROLE)
                .add_message(Message::user(format!("{SUMMARY_PROMPT}{chunk}")))
                .build();

            let response = self.provider.complete(request).await?;
            if let Some(summary) = response.message.text() {
                summaries.push(summary.trim().to_string());
            }
        }

        Ok(summaries.join("\n\n"))
    }
}

impl std::fmt::Debug for ScrapeWebsiteTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeWebsiteTool")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for ScrapeWebsiteTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: ScrapeParams = parse_params(params, "website")?;

        let result = async {
            let url = parse_website(&params.website)?;
            info!(url = %url, "Scraping website");
            let text = self.fetch(&url).await?;
            if text.trim().is_empty() {
                return Ok(format!("{url} has no readable content."));
            }
            self.summarize(&text).await
        }
        .await;

        result
            .map(Value::String)
            .map_err(|e| agent_core::Error::ProcessingFailed(e.to_string()))
    }

    fn name(&self) -> &str {
        "scrape_and_summarize_website"
    }

    fn description(&self) -> &str {
        "Useful to scrape and summarize a website content"
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({ "website": schema::string("Full URL of the page to read") }),
            vec!["website"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::{CompletionResponse, StopReason, TokenUsage};
    use mockall::mock;

    mock! {
        pub Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse>;
            fn name(&self) -> &str;
        }
    }

    fn response(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    #[test]
    fn test_parse_website() {
        assert_eq!(
            parse_website("https://finance.yahoo.com/quote/AAPL").unwrap().host_str(),
            Some("finance.yahoo.com")
        );
        assert_eq!(parse_website("www.sec.gov").unwrap().scheme(), "https");
        assert!(parse_website("ftp://example.com/file").is_err());
    }

    #[tokio::test]
    async fn test_summarize_per_chunk() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .withf(|req: &CompletionRequest| {
                req.model == "llama3-70b-8192"
                    && req.messages[0]
                        .text()
                        .is_some_and(|t| t.starts_with("Analyze and summarize the content below"))
            })
            .times(2)
            .returning(|req| {
                let len = req.messages[0].text().map_or(0, str::len);
                Ok(response(&format!(" summary of {len} bytes ")))
            });

        let tool = ScrapeWebsiteTool::new(Client::new(), Arc::new(provider), "llama3-70b-8192");
        let text = "a".repeat(CHUNK_CHARS + 10);
        let summary = tool.summarize(&text).await.unwrap();

        let parts: Vec<&str> = summary.split("\n\n").collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].starts_with("summary of"));
    }

    #[tokio::test]
    async fn test_summarize_caps_chunks() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .times(MAX_CHUNKS)
            .returning(|_| Ok(response("s")));

        let tool = ScrapeWebsiteTool::new(Client::new(), Arc::new(provider), "llama3-70b-8192");
        let text = "b".repeat(CHUNK_CHARS * (MAX_CHUNKS + 3));
        tool.summarize(&text).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_url_is_tool_error() {
        let mut provider = MockProvider::new();
        provider.expect_complete().never();

        let tool = ScrapeWebsiteTool::new(Client::new(), Arc::new(provider), "llama3-70b-8192");
        let err = tool.execute(json!({"website": "ftp://x"})).await.unwrap_err();
        assert!(err.to_string().contains("unsupported URL scheme"));
    }
}
