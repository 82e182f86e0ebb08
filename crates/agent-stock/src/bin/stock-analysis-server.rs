//! Stock analysis server
//!
//! # Usage
//!
//! ```bash
//! export GROQ_API_KEY="gsk_..."
//! export SERPER_API_KEY="..."
//! cargo run --bin stock-analysis-server -p agent-stock
//! ```

use agent_llm::providers::GroqProvider;
use agent_stock::progress::ProgressHub;
use agent_stock::{AppState, StockAnalysisAgents, StockAnalysisTasks, StockConfig, create_router};
use agent_workflow::SequentialOrchestrator;
use anyhow::Context as _;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "stock-analysis-server")]
#[command(about = "Runs multi-agent stock analyses and streams their progress", long_about = None)]
struct Args {
    /// Address to listen on (overrides STOCK_BIND)
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = agent_utils::load_dotenv();
    agent_utils::init_tracing();
    match dotenv {
        Some(path) => debug!(path = %path.display(), "Loaded .env"),
        None => debug!("No .env file loaded"),
    }

    let args = Args::parse();

    let mut config = StockConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Failed to load configuration");
    })?;
    if let Some(bind) = args.bind {
        config = config.with_bind_addr(bind);
    }
    if config.serper_api_key.is_none() {
        warn!("SERPER_API_KEY not set, search tools will report errors");
    }
    let config = Arc::new(config);

    let provider = Arc::new(
        GroqProvider::with_config(config.groq()).context("Failed to create Groq client")?,
    );

    let state = AppState {
        agents: Arc::new(StockAnalysisAgents::new(provider, config.clone())?),
        tasks: Arc::new(StockAnalysisTasks::new()?),
        orchestrator: Arc::new(SequentialOrchestrator::new()),
        hub: ProgressHub::default(),
    };

    let app = create_router(state, &config.server.cors_origin);
    let listener = tokio::net::TcpListener::bind(config.server.bind_addr).await?;
    info!(
        address = %config.server.bind_addr,
        model = %config.model,
        max_iterations = config.max_iterations,
        cors_origin = %config.server.cors_origin,
        "Stock analysis server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(agent_utils::shutdown_signal())
        .await?;

    info!("Stock analysis server shut down gracefully");
    Ok(())
}
