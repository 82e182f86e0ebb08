//! Tools bound to the analysis agents
//!
//! Every tool returns plain text for the model to read. Recoverable
//! outcomes (no results, no filing) are reported as text; transport and
//! input errors are returned as `Err` and fed back to the model.

pub mod browser;
pub mod calculator;
pub mod search;
pub mod sec;
pub mod yahoo_news;

pub use browser::ScrapeWebsiteTool;
pub use calculator::CalculatorTool;
pub use search::{SearchInternetTool, SearchNewsTool};
pub use sec::SecFilingSearchTool;
pub use yahoo_news::YahooFinanceNewsTool;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Deserialize tool parameters
///
/// Models sometimes pass the single argument as a bare string instead of an
/// object; that string is accepted as the value of `key`.
pub(crate) fn parse_params<T: DeserializeOwned>(params: Value, key: &str) -> agent_core::Result<T> {
    let params = match params {
        Value::String(s) => json!({ key: s }),
        other => other,
    };

    serde_json::from_value(params)
        .map_err(|e| agent_core::Error::ProcessingFailed(format!("Invalid parameters: {e}")))
}
