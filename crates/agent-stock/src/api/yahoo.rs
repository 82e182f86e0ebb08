//! Yahoo Finance news client

use crate::error::{Result, StockError};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const YAHOO_SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";

/// Yahoo rejects requests without a browser-like user agent
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// A news headline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub publisher: Option<String>,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<RawNews>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNews {
    title: String,
    link: String,
    publisher: Option<String>,
    provider_publish_time: Option<i64>,
}

impl From<RawNews> for NewsItem {
    fn from(raw: RawNews) -> Self {
        Self {
            title: raw.title,
            publisher: raw.publisher,
            link: raw.link,
            published_at: raw
                .provider_publish_time
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        }
    }
}

/// Parse the body of a Yahoo search response
pub fn parse_news(body: &str) -> Result<Vec<NewsItem>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.news.into_iter().map(NewsItem::from).collect())
}

/// Yahoo Finance news client
#[derive(Debug, Clone)]
pub struct YahooNewsClient {
    client: Client,
    search_url: String,
}

impl YahooNewsClient {
    /// Create a new Yahoo Finance news client
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .user_agent(BROWSER_USER_AGENT)
                .timeout(timeout)
                .build()?,
            search_url: YAHOO_SEARCH_URL.to_string(),
        })
    }

    /// Latest headlines for a ticker
    pub async fn get_news(&self, ticker: &str, count: usize) -> Result<Vec<NewsItem>> {
        let count = count.to_string();
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", ticker), ("quotesCount", "0"), ("newsCount", count.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StockError::ApiError(format!(
                "Yahoo Finance error: {}",
                response.status()
            )));
        }

        parse_news(&response.text().await?)
    }
}
