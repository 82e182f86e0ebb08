//! Task templates of the stock analysis crew

use agent_core::{Agent, Result};
use agent_prompt::JinjaTemplate;
use agent_workflow::Task;
use serde_json::json;
use std::sync::Arc;

const TIP: &str = "If you do your BEST WORK, I'll give you a $10,000 commission!";

const RESEARCH: &str = "Collect and summarize recent news articles, press releases, and market \
analyses related to the stock and its industry.
Pay special attention to any significant events, market sentiments, and analysts' opinions. \
Also include upcoming events like earnings and others.

Your final answer MUST be a report that includes a comprehensive summary of the latest news, \
any notable shifts in market sentiment, and potential impacts on the stock.
Also make sure to return the stock ticker.

{{ tip }}

Make sure to use the most recent data as possible.

Selected company by the customer: {{ company }}";

const FINANCIAL_ANALYSIS: &str = "Conduct a thorough analysis of the stock's financial health \
and market performance.
This includes examining key financial metrics such as P/E ratio, EPS growth, revenue trends, \
and debt-to-equity ratio.
Also, analyze the stock's performance in comparison to its industry peers and overall market trends.

Your final report MUST expand on the summary provided but now including a clear assessment of \
the stock's financial standing, its strengths and weaknesses, and how it fares against its \
competitors in the current market scenario.

{{ tip }}

Make sure to use the most recent data possible.";

const FILINGS_ANALYSIS: &str = "Analyze the latest 10-Q and 10-K filings from EDGAR for the \
stock in question.
Focus on key sections like Management's Discussion and Analysis, financial statements, insider \
trading activity, and any disclosed risks.
Extract relevant data and insights that could influence the stock's future performance.

Your final answer must be an expanded report that now also highlights significant findings from \
these filings, including any red flags or positive indicators for your customer.

{{ tip }}";

const RECOMMEND: &str = "Review and synthesize the analyses provided by the Financial Analyst \
and the Research Analyst.
Combine these insights to form a comprehensive investment recommendation.

You MUST Consider all aspects, including financial health, market sentiment, and qualitative \
data from EDGAR filings.

Make sure to include a section that shows insider trading activity, and upcoming events like earnings.

Your final answer MUST be a recommendation for your customer. It should be a full super detailed \
report, providing a clear investment stance and strategy with supporting evidence.
Make it pretty and well formatted for your customer.

{{ tip }}";

/// Renders the four tasks of an analysis run
#[derive(Debug, Clone)]
pub struct StockAnalysisTasks {
    research: JinjaTemplate,
    financial_analysis: JinjaTemplate,
    filings_analysis: JinjaTemplate,
    recommend: JinjaTemplate,
}

impl StockAnalysisTasks {
    /// Compile the task templates
    pub fn new() -> Result<Self> {
        Ok(Self {
            research: JinjaTemplate::new("research", RESEARCH)?,
            financial_analysis: JinjaTemplate::new("financial_analysis", FINANCIAL_ANALYSIS)?,
            filings_analysis: JinjaTemplate::new("filings_analysis", FILINGS_ANALYSIS)?,
            recommend: JinjaTemplate::new("recommend", RECOMMEND)?,
        })
    }

    fn task(
        template: &JinjaTemplate,
        company: &str,
        expected_output: &str,
        agent: Arc<dyn Agent>,
    ) -> Result<Task> {
        let description = template.render(&json!({ "company": company, "tip": TIP }))?;

        Task::builder(template.name())
            .description(description)
            .expected_output(expected_output)
            .agent(agent)
            .build()
    }

    /// News and sentiment research on the company
    pub fn research(&self, agent: Arc<dyn Agent>, company: &str) -> Result<Task> {
        Self::task(
            &self.research,
            company,
            "A comprehensive news and sentiment report on the stock, including its ticker.",
            agent,
        )
    }

    /// Financial health and peer comparison
    pub fn financial_analysis(&self, agent: Arc<dyn Agent>, company: &str) -> Result<Task> {
        Self::task(
            &self.financial_analysis,
            company,
            "An expanded report assessing the stock's financial standing against its competitors.",
            agent,
        )
    }

    /// 10-Q and 10-K review
    pub fn filings_analysis(&self, agent: Arc<dyn Agent>, company: &str) -> Result<Task> {
        Self::task(
            &self.filings_analysis,
            company,
            "An expanded report highlighting red flags and positive indicators from the latest filings.",
            agent,
        )
    }

    /// Final investment recommendation
    pub fn recommend(&self, agent: Arc<dyn Agent>, company: &str) -> Result<Task> {
        Self::task(
            &self.recommend,
            company,
            "A detailed, well formatted investment recommendation with a clear stance and strategy.",
            agent,
        )
    }
}

#[cfg(test)]
impl StockAnalysisTasks {
    /// Swap in a different research template
    pub(crate) fn with_research_template(mut self, source: &str) -> Result<Self> {
        self.research = JinjaTemplate::new("research", source)?;
        Ok(self)
    }
}
