//! Question answering over the latest 10-Q / 10-K filing

use super::parse_params;
use crate::api::sec_edgar::filing_url;
use crate::api::{FilingType, SecEdgarClient};
use crate::error::{Result, StockError};
use crate::text::relevant_passages;
use agent_core::Result as AgentResult;
use agent_llm::tools::schema;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

const MAX_PASSAGES: usize = 4;
const PASSAGE_CHARS: usize = 1500;

#[derive(Debug, Deserialize)]
struct FilingParams {
    query: String,
}

/// Split `TICKER|question`
pub fn parse_query(query: &str) -> Result<(String, String)> {
    let (ticker, question) = query.split_once('|').ok_or_else(|| {
        StockError::InvalidInput("expected 'TICKER|question', e.g. 'AAPL|what was last quarter's revenue'".to_string())
    })?;

    let ticker = ticker.trim().to_uppercase();
    let question = question.trim().to_string();
    if ticker.is_empty() || question.is_empty() {
        return Err(StockError::InvalidInput(
            "both ticker and question are required".to_string(),
        ));
    }
    Ok((ticker, question))
}

/// Searches the latest filing of one form type
#[derive(Debug, Clone)]
pub struct SecFilingSearchTool {
    sec: Arc<SecEdgarClient>,
    form: FilingType,
    name: String,
    description: String,
}

impl SecFilingSearchTool {
    pub fn new(sec: Arc<SecEdgarClient>, form: FilingType) -> Self {
        let (name, period) = match form {
            FilingType::Form10Q => ("search_10q", "quarterly"),
            FilingType::Form10K => ("search_10k", "annual"),
        };

        Self {
            sec,
            form,
            name: name.to_string(),
            description: format!(
                "Useful to search information from the latest {form} ({period}) filing for a given stock. \
                 The input should be a pipe (|) separated text of length two, representing the stock \
                 ticker you are interested in and what question you have from it, \
                 e.g. `AAPL|what was last quarter's revenue`."
            ),
        }
    }

    async fn search(&self, query: &str) -> Result<String> {
        let (ticker, question) = parse_query(query)?;

        let cik = self.sec.get_cik(&ticker).await?;
        let Some(filing) = self.sec.latest_filing(cik, self.form).await? else {
            return Ok(format!(
                "No {} filing found for {ticker}. Check that the ticker is correct.",
                self.form
            ));
        };

        let url = filing_url(cik, &filing);
        info!(ticker = %ticker, form = %self.form, url = %url, "Searching filing");

        let text = self.sec.fetch_document_text(&url).await?;
        let passages = relevant_passages(&text, &question, MAX_PASSAGES, PASSAGE_CHARS);
        debug!(passages = passages.len(), "Matched passages");

        let header = format!(
            "Latest {} for {ticker} (filed {}): {url}",
            self.form, filing.filing_date
        );
        if passages.is_empty() {
            return Ok(format!("{header}\n\nNo passages in the filing matched '{question}'."));
        }
        Ok(format!("{header}\n\n{}", passages.join("\n\n---\n\n")))
    }
}

#[async_trait]
impl Tool for SecFilingSearchTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: FilingParams = parse_params(params, "query")?;
        self.search(&params.query)
            .await
            .map(Value::String)
            .map_err(|e| agent_core::Error::ProcessingFailed(e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({ "query": schema::string("TICKER|question, e.g. AAPL|what was last quarter's revenue") }),
            vec!["query"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> Arc<SecEdgarClient> {
        Arc::new(SecEdgarClient::new("agent-stock test@example.com", Duration::from_secs(5)).unwrap())
    }

    #[test]
    fn test_parse_query() {
        let (ticker, question) = parse_query(" aapl | what was revenue? ").unwrap();
        assert_eq!(ticker, "AAPL");
        assert_eq!(question, "what was revenue?");
    }

    #[test]
    fn test_parse_query_rejects_bad_input() {
        assert!(matches!(parse_query("AAPL revenue"), Err(StockError::InvalidInput(_))));
        assert!(parse_query("|revenue").is_err());
        assert!(parse_query("AAPL|  ").is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(SecFilingSearchTool::new(client(), FilingType::Form10Q).name(), "search_10q");

        let tool = SecFilingSearchTool::new(client(), FilingType::Form10K);
        assert_eq!(tool.name(), "search_10k");
        assert!(tool.description().contains("10-K (annual)"));
    }

    #[tokio::test]
    async fn test_bad_input_is_tool_error() {
        let tool = SecFilingSearchTool::new(client(), FilingType::Form10Q);
        let err = tool.execute(json!({"query": "AAPL"})).await.unwrap_err();
        assert!(err.to_string().contains("TICKER|question"));
    }
}
