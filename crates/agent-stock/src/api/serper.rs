//! Serper (Google search) client

use crate::error::{Result, StockError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

const SERPER_BASE_URL: &str = "https://google.serper.dev";

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
    /// Publication date, news results only
    pub date: Option<String>,
    /// Publisher, news results only
    pub source: Option<String>,
}

impl SearchResult {
    fn from_value(item: &Value) -> Option<Self> {
        let field = |name: &str| item.get(name).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            title: field("title")?,
            link: field("link")?,
            snippet: field("snippet").unwrap_or_default(),
            date: field("date"),
            source: field("source"),
        })
    }
}

/// Extract hits from a Serper response (`organic` for web, `news` for news)
pub fn parse_results(body: &Value, key: &str) -> Vec<SearchResult> {
    body.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(SearchResult::from_value).collect())
        .unwrap_or_default()
}

/// Serper API client
#[derive(Debug, Clone)]
pub struct SerperClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl SerperClient {
    /// Create a client; without a key every search fails with a configuration error
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: SERPER_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Web search
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let body = self.post("search", query).await?;
        Ok(parse_results(&body, "organic"))
    }

    /// News search
    pub async fn news(&self, query: &str) -> Result<Vec<SearchResult>> {
        let body = self.post("news", query).await?;
        Ok(parse_results(&body, "news"))
    }

    async fn post(&self, endpoint: &str, query: &str) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| StockError::ConfigError("SERPER_API_KEY is not set".to_string()))?;

        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, query, "Serper request");

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", api_key)
            .json(&json!({ "q": query }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StockError::ApiError(format!(
                "Serper API error: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organic() {
        let body = json!({
            "organic": [
                {"title": "Apple Q3 results", "link": "https://example.com/a", "snippet": "Revenue up"},
                {"title": "No link"},
                {"title": "Apple guidance", "link": "https://example.com/b"}
            ]
        });

        let results = parse_results(&body, "organic");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].snippet, "Revenue up");
        assert_eq!(results[1].snippet, "");
    }

    #[test]
    fn test_parse_news() {
        let body = json!({
            "news": [{
                "title": "Apple beats estimates",
                "link": "https://example.com/n",
                "snippet": "Shares rose",
                "date": "2 hours ago",
                "source": "Reuters"
            }]
        });

        let results = parse_results(&body, "news");
        assert_eq!(results[0].source.as_deref(), Some("Reuters"));
        assert!(parse_results(&body, "organic").is_empty());
    }

    #[tokio::test]
    async fn test_missing_key() {
        let client = SerperClient::new(None, Duration::from_secs(5)).unwrap();
        let result = client.search("AAPL").await;
        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }
}
