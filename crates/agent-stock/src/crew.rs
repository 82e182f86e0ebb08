//! One stock analysis run
//!
//! [`FinancialCrew`] assembles the three analysts and four tasks, hands
//! them to an [`Orchestrator`] and reports progress along the way.

use crate::agents::StockAnalysisAgents;
use crate::error::Result;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::tasks::StockAnalysisTasks;
use agent_core::{Agent, Context};
use agent_workflow::{Crew, CrewObserver, Orchestrator, Task};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Progress message announcing the task at `index`
pub fn stage_message(index: usize, company: &str) -> Option<String> {
    match index {
        0 => Some(format!("Starting research analysis for {company}...")),
        1 => Some("Conducting financial analysis...".to_string()),
        2 => Some("Analyzing financial filings...".to_string()),
        3 => Some("Preparing investment recommendations...".to_string()),
        _ => None,
    }
}

/// Turns task starts into stage progress events
struct StageObserver {
    sink: Arc<dyn ProgressSink>,
    company: String,
}

impl CrewObserver for StageObserver {
    fn on_task_start(&self, index: usize, task: &Task) {
        if let Some(message) = stage_message(index, &self.company) {
            self.sink.emit(ProgressEvent::Progress(message));
        }
        debug!(index, task = task.name(), "Stage started");
    }

    fn on_task_complete(&self, index: usize, task: &Task, output: &str) {
        debug!(index, task = task.name(), output_length = output.len(), "Stage finished");
    }
}

/// A single analysis of one company
pub struct FinancialCrew {
    company: String,
    session_id: String,
    sink: Arc<dyn ProgressSink>,
}

impl FinancialCrew {
    pub fn new(
        company: impl Into<String>,
        session_id: impl Into<String>,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            company: company.into(),
            session_id: session_id.into(),
            sink,
        }
    }

    /// Run the analysis and return the final recommendation
    ///
    /// Ends with exactly one `analysis_complete` or `analysis_error` event.
    #[instrument(skip_all, fields(company = %self.company, session_id = %self.session_id))]
    pub async fn run(
        &self,
        agents: &StockAnalysisAgents,
        tasks: &StockAnalysisTasks,
        orchestrator: &dyn Orchestrator,
    ) -> Result<String> {
        info!("Analysis started");

        match self.kickoff(agents, tasks, orchestrator).await {
            Ok(result) => {
                info!(result_length = result.len(), "Analysis complete");
                self.sink.emit(ProgressEvent::Complete(result.clone()));
                Ok(result)
            }
            Err(e) => {
                error!(error = %e, "Analysis failed");
                self.sink.emit(ProgressEvent::Error(e.to_string()));
                Err(e)
            }
        }
    }

    fn announce(&self, message: &str) {
        self.sink.emit(ProgressEvent::Progress(message.to_string()));
    }

    async fn kickoff(
        &self,
        agents: &StockAnalysisAgents,
        tasks: &StockAnalysisTasks,
        orchestrator: &dyn Orchestrator,
    ) -> Result<String> {
        self.announce("Initializing research analyst...");
        let research_analyst: Arc<dyn Agent> = agents.research_analyst()?;

        self.announce("Initializing financial analyst...");
        let financial_analyst: Arc<dyn Agent> = agents.financial_analyst()?;

        self.announce("Initializing investment advisor...");
        let investment_advisor: Arc<dyn Agent> = agents.investment_advisor()?;

        let company = self.company.as_str();
        let crew = Crew::builder()
            .agent(research_analyst.clone())
            .agent(financial_analyst.clone())
            .agent(investment_advisor.clone())
            .task(tasks.research(research_analyst, company)?)
            .task(tasks.financial_analysis(financial_analyst.clone(), company)?)
            .task(tasks.filings_analysis(financial_analyst, company)?)
            .task(tasks.recommend(investment_advisor, company)?)
            .context(
                Context::new()
                    .with_session_id(&self.session_id)
                    .with_company(company),
            )
            .verbose(true)
            .build()?;

        let observer = Arc::new(StageObserver {
            sink: self.sink.clone(),
            company: self.company.clone(),
        });

        let output = orchestrator.kickoff(crew, observer).await?;
        Ok(output.final_output)
    }
}
