//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGINT and SIGTERM handlers (Ctrl+C off unix)
//! - Trigger the shutdown scope once, on the first signal
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Handlers are registered before the listener task is spawned so a
//!   registration failure is reported at startup instead of being lost

use tokio::task::JoinHandle;

use crate::error::LifecycleError;
use crate::lifecycle::shutdown::{OsSignal, Shutdown, ShutdownCause};

/// Background task that forwards the first termination signal to a
/// [`Shutdown`] scope.
pub struct SignalListener;

impl SignalListener {
    /// Register handlers and spawn the listener.
    ///
    /// Must be called from within a Tokio runtime. The task exits after the
    /// first signal, or quietly if the scope is triggered some other way.
    pub fn install(shutdown: Shutdown) -> Result<JoinHandle<()>, LifecycleError> {
        let mut signals = Signals::register()?;
        let mut scope = shutdown.subscribe();

        Ok(tokio::spawn(async move {
            tokio::select! {
                signal = signals.recv() => {
                    tracing::info!(signal = %signal, "Received signal, shutting down");
                    shutdown.trigger(ShutdownCause::Signal(signal));
                }
                _ = scope.recv() => {
                    tracing::debug!("Shutdown triggered elsewhere, signal listener exiting");
                }
            }
        }))
    }
}

#[cfg(unix)]
struct Signals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn register() -> Result<Self, LifecycleError> {
        use tokio::signal::unix::{signal, SignalKind};

        let interrupt = signal(SignalKind::interrupt()).map_err(|source| {
            LifecycleError::SignalRegistration {
                signal: OsSignal::Interrupt.name(),
                source,
            }
        })?;
        let terminate = signal(SignalKind::terminate()).map_err(|source| {
            LifecycleError::SignalRegistration {
                signal: OsSignal::Terminate.name(),
                source,
            }
        })?;

        Ok(Self {
            interrupt,
            terminate,
        })
    }

    async fn recv(&mut self) -> OsSignal {
        tokio::select! {
            _ = self.interrupt.recv() => OsSignal::Interrupt,
            _ = self.terminate.recv() => OsSignal::Terminate,
        }
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn register() -> Result<Self, LifecycleError> {
        Ok(Self)
    }

    async fn recv(&mut self) -> OsSignal {
        match tokio::signal::ctrl_c().await {
            Ok(()) => OsSignal::Interrupt,
            Err(e) => {
                tracing::error!(error = %e, "Ctrl+C handler failed, signals disabled");
                std::future::pending().await
            }
        }
    }
}
