//! Graceful shutdown

use tracing::{error, info};

/// Resolve once Ctrl-C is received
///
/// If the signal handler cannot be installed the future never resolves, so
/// the server keeps running until it is killed.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
