//! Yahoo Finance headlines tool

use super::parse_params;
use crate::api::{NewsItem, YahooNewsClient};
use agent_core::Result as AgentResult;
use agent_llm::tools::schema;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

const NEWS_COUNT: usize = 8;

#[derive(Debug, Deserialize)]
struct NewsParams {
    query: String,
}

/// Render headlines for the model
pub fn format_news(ticker: &str, news: &[NewsItem]) -> String {
    if news.is_empty() {
        return format!("No news found for company that searched with {ticker} ticker.");
    }

    news.iter()
        .map(|item| {
            let mut meta = Vec::new();
            if let Some(publisher) = &item.publisher {
                meta.push(publisher.clone());
            }
            if let Some(at) = item.published_at {
                meta.push(at.format("%Y-%m-%d").to_string());
            }

            if meta.is_empty() {
                format!("{}\n{}", item.title, item.link)
            } else {
                format!("{} ({})\n{}", item.title, meta.join(", "), item.link)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fetches recent headlines for a ticker
#[derive(Debug, Clone)]
pub struct YahooFinanceNewsTool {
    yahoo: Arc<YahooNewsClient>,
}

impl YahooFinanceNewsTool {
    pub fn new(yahoo: Arc<YahooNewsClient>) -> Self {
        Self { yahoo }
    }
}

#[async_trait]
impl Tool for YahooFinanceNewsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: NewsParams = parse_params(params, "query")?;
        let ticker = params.query.trim().to_uppercase();

        let news = self
            .yahoo
            .get_news(&ticker, NEWS_COUNT)
            .await
            .map_err(|e| agent_core::Error::ProcessingFailed(e.to_string()))?;

        Ok(Value::String(format_news(&ticker, &news)))
    }

    fn name(&self) -> &str {
        "yahoo_finance_news"
    }

    fn description(&self) -> &str {
        "Useful for when you need to find financial news about a public company. \
         Input should be a company ticker. For example, AAPL for Apple, MSFT for Microsoft."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({ "query": schema::string("Company ticker, e.g. AAPL") }),
            vec!["query"],
        )
    }
}
