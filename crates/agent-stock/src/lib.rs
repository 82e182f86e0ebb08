//! Multi-agent stock analysis service
//!
//! A request names a company. Three analysts (research analyst, financial
//! analyst, investment advisor) work through four tasks in order: research,
//! financial analysis, filings analysis and recommendation. The last task's
//! output is the result.
//!
//! Runs report progress through a [`progress::ProgressHub`]; WebSocket
//! listeners subscribe per session id.
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_stock::{FinancialCrew, StockAnalysisAgents, StockAnalysisTasks, StockConfig};
//! use agent_stock::progress::ProgressHub;
//! use agent_llm::providers::GroqProvider;
//! use agent_workflow::SequentialOrchestrator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(StockConfig::from_env()?);
//!     let provider = Arc::new(GroqProvider::with_config(config.groq())?);
//!     let agents = StockAnalysisAgents::new(provider, config)?;
//!     let tasks = StockAnalysisTasks::new()?;
//!
//!     let hub = ProgressHub::default();
//!     let crew = FinancialCrew::new("AAPL", "session-1", Arc::new(hub.publisher("session-1")));
//!     let result = crew.run(&agents, &tasks, &SequentialOrchestrator::new()).await?;
//!     println!("{result}");
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod api;
pub mod config;
pub mod crew;
pub mod error;
pub mod progress;
pub mod server;
pub mod tasks;
pub mod text;
pub mod tools;

pub use agents::StockAnalysisAgents;
pub use config::StockConfig;
pub use crew::FinancialCrew;
pub use error::{Result, StockError};
pub use server::{AppState, create_router};
pub use tasks::StockAnalysisTasks;
