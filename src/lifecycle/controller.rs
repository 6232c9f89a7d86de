//! Mode dispatch and drain.
//!
//! # Responsibilities
//! - Move the process through `Starting → Running → ShuttingDown → Stopped`
//! - Run the selected mode against the shared shutdown scope
//! - Bound how long a mode may take to return once shutdown begins
//!
//! # Design Decisions
//! - Fail fast: a mode error triggers the scope and is returned, never retried
//! - The drain deadline comes from `server.shutdown_timeout`

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::LincolnConfig;
use crate::error::LifecycleError;
use crate::lifecycle::shutdown::{Shutdown, ShutdownCause};
use crate::lifecycle::state::{LifecycleState, StateTracker};
use crate::modes::Mode;

pub struct Lifecycle {
    shutdown: Shutdown,
    state: StateTracker,
}

impl Lifecycle {
    pub fn new(shutdown: Shutdown) -> Self {
        Self {
            shutdown,
            state: StateTracker::new(),
        }
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    pub fn state(&self) -> LifecycleState {
        self.state.current()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Run `mode` until the scope is triggered and the mode has returned.
    pub async fn run(
        &self,
        mode: Mode,
        config: &LincolnConfig,
    ) -> Result<ShutdownCause, LifecycleError> {
        let signal = self.shutdown.subscribe();
        self.drive(
            mode.name(),
            config.server.shutdown_timeout,
            mode.run(config, signal),
        )
        .await
    }

    /// Drive an arbitrary mode future through the lifecycle.
    pub async fn drive<F>(
        &self,
        name: &'static str,
        drain_timeout: Duration,
        mode: F,
    ) -> Result<ShutdownCause, LifecycleError>
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        tokio::pin!(mode);
        let mut scope = self.shutdown.subscribe();

        self.state.advance(LifecycleState::Running);
        tracing::info!(mode = name, "Lifecycle running");

        let early = tokio::select! {
            result = &mut mode => Some(result),
            _ = scope.recv() => None,
        };

        let result = match early {
            Some(result) => result,
            None => {
                self.state.advance(LifecycleState::ShuttingDown);
                tracing::info!(
                    mode = name,
                    timeout = ?drain_timeout,
                    "Waiting for mode to stop"
                );
                match tokio::time::timeout(drain_timeout, &mut mode).await {
                    Ok(result) => result,
                    Err(_) => {
                        self.state.advance(LifecycleState::Stopped);
                        return Err(LifecycleError::ShutdownTimeout {
                            mode: name,
                            timeout: drain_timeout,
                        });
                    }
                }
            }
        };

        if let Err(source) = result {
            self.shutdown.trigger(ShutdownCause::ModeFailed);
            self.state.advance(LifecycleState::ShuttingDown);
            self.state.advance(LifecycleState::Stopped);
            return Err(LifecycleError::Mode { mode: name, source });
        }

        self.shutdown.trigger(ShutdownCause::ModeExited);
        self.state.advance(LifecycleState::ShuttingDown);
        self.state.advance(LifecycleState::Stopped);
        Ok(self.shutdown.cause().unwrap_or(ShutdownCause::ModeExited))
    }
}
