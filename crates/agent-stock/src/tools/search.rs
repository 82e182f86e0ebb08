//! Web and news search tools backed by Serper

use super::parse_params;
use crate::api::{SearchResult, SerperClient};
use agent_core::Result as AgentResult;
use agent_llm::tools::schema;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Results shown to the model per search
const TOP_RESULTS: usize = 4;

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
}

/// Render search hits for the model
pub fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for '{query}'. The search service may be misconfigured.");
    }

    results
        .iter()
        .take(TOP_RESULTS)
        .map(|r| {
            let mut entry = format!("Title: {}\nLink: {}\n", r.title, r.link);
            if let Some(source) = &r.source {
                entry.push_str(&format!("Source: {source}\n"));
            }
            if let Some(date) = &r.date {
                entry.push_str(&format!("Date: {date}\n"));
            }
            entry.push_str(&format!("Snippet: {}\n\n-----------------", r.snippet));
            entry
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn query_schema() -> Value {
    schema::object(
        json!({ "query": schema::string("What to search for") }),
        vec!["query"],
    )
}

fn to_agent_error(e: crate::error::StockError) -> agent_core::Error {
    agent_core::Error::ProcessingFailed(e.to_string())
}

/// Searches the web
#[derive(Debug, Clone)]
pub struct SearchInternetTool {
    serper: Arc<SerperClient>,
}

impl SearchInternetTool {
    pub fn new(serper: Arc<SerperClient>) -> Self {
        Self { serper }
    }
}

#[async_trait]
impl Tool for SearchInternetTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: SearchParams = parse_params(params, "query")?;
        let results = self.serper.search(&params.query).await.map_err(to_agent_error)?;
        Ok(Value::String(format_results(&params.query, &results)))
    }

    fn name(&self) -> &str {
        "search_internet"
    }

    fn description(&self) -> &str {
        "Useful to search the internet about a given topic and return relevant results."
    }

    fn input_schema(&self) -> Value {
        query_schema()
    }
}

/// Searches recent news
#[derive(Debug, Clone)]
pub struct SearchNewsTool {
    serper: Arc<SerperClient>,
}

impl SearchNewsTool {
    pub fn new(serper: Arc<SerperClient>) -> Self {
        Self { serper }
    }
}

#[async_trait]
impl Tool for SearchNewsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: SearchParams = parse_params(params, "query")?;
        let results = self.serper.news(&params.query).await.map_err(to_agent_error)?;
        Ok(Value::String(format_results(&params.query, &results)))
    }

    fn name(&self) -> &str {
        "search_news"
    }

    fn description(&self) -> &str {
        "Useful to search news about a company, stock or any other topic and return relevant results."
    }

    fn input_schema(&self) -> Value {
        query_schema()
    }
}
