//! SEC EDGAR client for locating and reading company filings
//!
//! SEC EDGAR is the Electronic Data Gathering, Analysis, and Retrieval system
//! used by the U.S. Securities and Exchange Commission.
//!
//! Rate limit: 10 requests per second (SEC fair access policy).
//! User-Agent requirement: must identify the caller with a contact address.

use crate::error::{Result, StockError};
use crate::text::render_html;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const SEC_BASE_URL: &str = "https://data.sec.gov";
const SEC_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";
const SEC_COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

const SEC_REQUESTS_PER_SECOND: NonZeroU32 = match NonZeroU32::new(10) {
    Some(n) => n,
    None => NonZeroU32::MIN,
};

/// SEC filing type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingType {
    /// Annual report
    #[serde(rename = "10-K")]
    Form10K,
    /// Quarterly report
    #[serde(rename = "10-Q")]
    Form10Q,
}

impl FilingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingType::Form10K => "10-K",
            FilingType::Form10Q => "10-Q",
        }
    }
}

impl std::fmt::Display for FilingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SEC filing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecFiling {
    /// Accession number (unique filing identifier)
    pub accession_number: String,
    /// Filing type (10-K, 10-Q, ...)
    pub form_type: String,
    /// Filing date
    pub filing_date: String,
    /// Report date (period covered)
    pub report_date: Option<String>,
    /// Primary document filename
    pub primary_document: String,
}

/// Entry of `company_tickers.json`
#[derive(Debug, Clone, Deserialize)]
pub struct TickerEntry {
    /// CIK, published as a bare number
    pub cik_str: u64,
    pub ticker: String,
    pub title: String,
}

/// SEC submissions response
#[derive(Debug, Clone, Deserialize)]
pub struct CompanySubmissions {
    pub cik: String,
    pub name: String,
    pub filings: FilingsData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilingsData {
    pub recent: RecentFilings,
}

/// Column-oriented list of the most recent filings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecentFilings {
    pub accession_number: Vec<String>,
    pub filing_date: Vec<String>,
    pub report_date: Vec<String>,
    pub form: Vec<String>,
    pub primary_document: Vec<String>,
}

impl RecentFilings {
    /// Filings of `form_type`, newest first (EDGAR already orders them)
    ///
    /// Rows with a missing column are skipped.
    pub fn of_type(&self, form_type: FilingType) -> Vec<SecFiling> {
        self.form
            .iter()
            .enumerate()
            .filter(|(_, form)| form.as_str() == form_type.as_str())
            .filter_map(|(i, form)| {
                Some(SecFiling {
                    accession_number: self.accession_number.get(i)?.clone(),
                    form_type: form.clone(),
                    filing_date: self.filing_date.get(i)?.clone(),
                    report_date: self
                        .report_date
                        .get(i)
                        .filter(|d| !d.is_empty())
                        .cloned(),
                    primary_document: self.primary_document.get(i)?.clone(),
                })
            })
            .collect()
    }
}

/// Look up a ticker's CIK in the parsed `company_tickers.json`
pub fn find_cik(entries: &HashMap<String, TickerEntry>, ticker: &str) -> Option<u64> {
    entries
        .values()
        .find(|entry| entry.ticker.eq_ignore_ascii_case(ticker))
        .map(|entry| entry.cik_str)
}

/// Archive URL of a filing's primary document
pub fn filing_url(cik: u64, filing: &SecFiling) -> String {
    format!(
        "{}/{}/{}/{}",
        SEC_ARCHIVES_URL,
        cik,
        filing.accession_number.replace('-', ""),
        filing.primary_document
    )
}

/// SEC EDGAR API client
#[derive(Clone)]
pub struct SecEdgarClient {
    client: Client,
    rate_limiter: SharedRateLimiter,
}

impl SecEdgarClient {
    /// Create a new SEC EDGAR client
    ///
    /// `user_agent` must name the application and a contact email, e.g.
    /// `"MyApp contact@example.com"`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_second(
                SEC_REQUESTS_PER_SECOND,
            ))),
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.rate_limiter.until_ready().await;
        debug!(url, "SEC request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StockError::ApiError(format!("SEC request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(StockError::ApiError(format!(
                "SEC API error: {}",
                response.status()
            )));
        }

        Ok(response)
    }

    /// Get CIK number from stock ticker
    pub async fn get_cik(&self, ticker: &str) -> Result<u64> {
        let entries: HashMap<String, TickerEntry> = self
            .get(SEC_COMPANY_TICKERS_URL)
            .await?
            .json()
            .await
            .map_err(|e| StockError::ApiError(format!("Failed to parse SEC response: {e}")))?;

        find_cik(&entries, ticker).ok_or_else(|| StockError::InvalidSymbol(ticker.to_string()))
    }

    /// Get company submissions (filing history)
    pub async fn get_company_submissions(&self, cik: u64) -> Result<CompanySubmissions> {
        let url = format!("{SEC_BASE_URL}/submissions/CIK{cik:010}.json");

        self.get(&url)
            .await?
            .json()
            .await
            .map_err(|e| StockError::ApiError(format!("Failed to parse SEC response: {e}")))
    }

    /// Most recent filing of `form_type`, if the company has one
    pub async fn latest_filing(&self, cik: u64, form_type: FilingType) -> Result<Option<SecFiling>> {
        let submissions = self.get_company_submissions(cik).await?;
        Ok(submissions
            .filings
            .recent
            .of_type(form_type)
            .into_iter()
            .next())
    }

    /// Download a filing document and convert it to plain text
    pub async fn fetch_document_text(&self, url: &str) -> Result<String> {
        let body = self.get(url).await?.bytes().await?;
        render_html(body).await
    }
}

impl std::fmt::Debug for SecEdgarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecEdgarClient").finish_non_exhaustive()
    }
}
