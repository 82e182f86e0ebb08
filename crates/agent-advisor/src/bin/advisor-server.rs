//! Financial advisor answer server
//!
//! # Usage
//!
//! ```bash
//! export GROQ_API_KEY="gsk_..."
//! cargo run --bin advisor-server -p agent-advisor
//! ```

use agent_advisor::{AdvisorConfig, AnswerService, AppState, create_router};
use agent_llm::providers::GroqProvider;
use anyhow::Context as _;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(name = "advisor-server")]
#[command(about = "Answers financial questions in the voice of an advisor", long_about = None)]
struct Args {
    /// Address to listen on (overrides ADVISOR_BIND)
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

    let mut config = AdvisorConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Failed to load configuration");
    })?;
    if let Some(bind) = args.bind {
        config.server = config.server.with_bind_addr(bind);
    }

    let provider = Arc::new(
        GroqProvider::with_config(config.groq()).context("Failed to create Groq client")?,
    );
    let service = Arc::new(AnswerService::new(provider, config.model.clone())?);

    let app = create_router(AppState { service }, &config.server.cors_origin);
    let listener = tokio::net::TcpListener::bind(config.server.bind_addr).await?;
    info!(
        address = %config.server.bind_addr,
        model = %config.model,
        cors_origin = %config.server.cors_origin,
        "Advisor server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(agent_utils::shutdown_signal())
        .await?;

    info!("Advisor server shut down gracefully");
    Ok(())
}
