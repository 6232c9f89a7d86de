//! Agent mode.

use crate::config::LincolnConfig;
use crate::lifecycle::ShutdownSignal;

/// Run the agent until shutdown.
pub async fn run_agent(config: &LincolnConfig, mut shutdown: ShutdownSignal) -> anyhow::Result<()> {
    tracing::info!(
        environment = %config.server.environment,
        database = %config.database.target(),
        "Starting LINCOLN agent"
    );

    let cause = shutdown.recv().await;

    tracing::info!(cause = ?cause, "Shutting down agent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{Shutdown, ShutdownCause};
    use std::time::Duration;

    #[tokio::test]
    async fn test_agent_returns_after_shutdown() {
        let config = LincolnConfig::default();
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        shutdown.trigger(ShutdownCause::Manual);

        let result = tokio::time::timeout(Duration::from_secs(1), run_agent(&config, signal))
            .await
            .expect("agent should not block once shutdown is triggered");
        assert!(result.is_ok());
    }
}
