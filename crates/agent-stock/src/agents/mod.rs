//! The three analysts of a stock analysis crew
//!
//! Agents are built fresh for every run; the HTTP clients they share are
//! created once and cloned into each tool.

use crate::api::{FilingType, SecEdgarClient, SerperClient, YahooNewsClient};
use crate::config::StockConfig;
use crate::error::Result;
use crate::tools::{
    CalculatorTool, ScrapeWebsiteTool, SearchInternetTool, SearchNewsTool, SecFilingSearchTool,
    YahooFinanceNewsTool,
};
use agent_llm::LLMProvider;
use agent_runtime::{ExecutorConfig, RoleAgent};
use agent_tools::{Tool, ToolRegistry};
use reqwest::Client;
use std::sync::Arc;

/// Builds the research analyst, financial analyst and investment advisor
pub struct StockAnalysisAgents {
    provider: Arc<dyn LLMProvider>,
    config: Arc<StockConfig>,
    http: Client,
    serper: Arc<SerperClient>,
    sec: Arc<SecEdgarClient>,
    yahoo: Arc<YahooNewsClient>,
}

impl StockAnalysisAgents {
    /// Create the factory and its shared HTTP clients
    pub fn new(provider: Arc<dyn LLMProvider>, config: Arc<StockConfig>) -> Result<Self> {
        let timeout = config.request_timeout;

        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            serper: Arc::new(SerperClient::new(config.serper_api_key.clone(), timeout)?),
            sec: Arc::new(SecEdgarClient::new(&config.sec_user_agent, timeout)?),
            yahoo: Arc::new(YahooNewsClient::new(timeout)?),
            provider,
            config,
        })
    }

    fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            max_iterations: self.config.max_iterations,
            model: self.config.model.clone(),
            ..ExecutorConfig::default()
        }
    }

    fn scrape(&self) -> Arc<dyn Tool> {
        Arc::new(ScrapeWebsiteTool::new(
            self.http.clone(),
            self.provider.clone(),
            self.config.model.clone(),
        ))
    }

    fn search_internet(&self) -> Arc<dyn Tool> {
        Arc::new(SearchInternetTool::new(self.serper.clone()))
    }

    fn search_news(&self) -> Arc<dyn Tool> {
        Arc::new(SearchNewsTool::new(self.serper.clone()))
    }

    fn yahoo_news(&self) -> Arc<dyn Tool> {
        Arc::new(YahooFinanceNewsTool::new(self.yahoo.clone()))
    }

    fn calculator(&self) -> Arc<dyn Tool> {
        Arc::new(CalculatorTool::new())
    }

    fn search_10q(&self) -> Arc<dyn Tool> {
        Arc::new(SecFilingSearchTool::new(self.sec.clone(), FilingType::Form10Q))
    }

    fn search_10k(&self) -> Arc<dyn Tool> {
        Arc::new(SecFilingSearchTool::new(self.sec.clone(), FilingType::Form10K))
    }

    fn agent(
        &self,
        role: &str,
        goal: &str,
        backstory: &str,
        tools: Vec<Arc<dyn Tool>>,
    ) -> agent_core::Result<Arc<RoleAgent>> {
        let registry = tools.into_iter().fold(ToolRegistry::new(), ToolRegistry::with_tool);

        RoleAgent::builder()
            .role(role)
            .goal(goal)
            .backstory(backstory)
            .provider(self.provider.clone())
            .tools(registry)
            .config(self.executor_config())
            .build()
            .map(Arc::new)
    }

    /// News, sentiment and filings researcher
    pub fn research_analyst(&self) -> agent_core::Result<Arc<RoleAgent>> {
        self.agent(
            "Staff Research Analyst",
            "Be the best at gathering and interpreting data, and amaze your customers with it.",
            "Known as the BEST research analyst, you're skilled in sifting through news, \
             company announcements, and market sentiments. Now you're working for an important customer.",
            vec![
                self.scrape(),
                self.search_internet(),
                self.search_news(),
                self.yahoo_news(),
                self.search_10q(),
                self.search_10k(),
            ],
        )
    }

    /// Financial metrics and filings analyst
    pub fn financial_analyst(&self) -> agent_core::Result<Arc<RoleAgent>> {
        self.agent(
            "The Best Financial Analyst",
            "Impress all customers with your financial data and market trends analysis.",
            "The most seasoned financial analyst with lots of expertise in stock market analysis \
             and investment strategies. Now working for an important customer.",
            vec![
                self.scrape(),
                self.search_internet(),
                self.calculator(),
                self.search_10q(),
                self.search_10k(),
            ],
        )
    }

    /// Writes the final recommendation
    pub fn investment_advisor(&self) -> agent_core::Result<Arc<RoleAgent>> {
        self.agent(
            "Private Investment Advisor",
            "Impress your customers with full analyses of stocks and complete investment recommendations.",
            "You're the most experienced investment advisor combining various analytical insights \
             to formulate strategic investment advice. Now working for an important customer.",
            vec![
                self.scrape(),
                self.search_internet(),
                self.search_news(),
                self.calculator(),
                self.yahoo_news(),
            ],
        )
    }
}

impl std::fmt::Debug for StockAnalysisAgents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockAnalysisAgents")
            .field("model", &self.config.model)
            .field("max_iterations", &self.config.max_iterations)
            .finish_non_exhaustive()
    }
}
