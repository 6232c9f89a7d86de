//! Server mode.

use crate::config::LincolnConfig;
use crate::lifecycle::ShutdownSignal;

/// Run the server until shutdown.
///
/// No request handling exists yet; the loop only demonstrates the shutdown
/// path.
pub async fn run_server(config: &LincolnConfig, mut shutdown: ShutdownSignal) -> anyhow::Result<()> {
    tracing::info!(
        address = %config.server.listen_address(),
        environment = %config.server.environment,
        "Starting LINCOLN server"
    );

    let cause = shutdown.recv().await;

    tracing::info!(cause = ?cause, "Shutting down server");
    Ok(())
}
