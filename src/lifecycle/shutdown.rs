//! Shutdown coordination for the process.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Why the cancellation scope was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    /// An OS termination signal arrived.
    Signal(OsSignal),
    /// The mode function returned an error.
    ModeFailed,
    /// The mode function returned on its own without being cancelled.
    ModeExited,
    /// Triggered programmatically.
    Manual,
}

impl fmt::Display for ShutdownCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownCause::Signal(signal) => write!(f, "signal {}", signal),
            ShutdownCause::ModeFailed => f.write_str("mode failed"),
            ShutdownCause::ModeExited => f.write_str("mode exited"),
            ShutdownCause::Manual => f.write_str("manual"),
        }
    }
}

/// Termination signals that trigger a graceful shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsSignal {
    Interrupt,
    Terminate,
}

impl OsSignal {
    pub fn name(&self) -> &'static str {
        match self {
            OsSignal::Interrupt => "SIGINT",
            OsSignal::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for OsSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cancellation scope shared by every long-running task.
///
/// Cloning is cheap; all clones trigger and observe the same scope. Only the
/// first trigger is recorded.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<Option<ShutdownCause>>>,
}

impl Shutdown {
    /// Create a new, untriggered scope.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the scope. Returns `false` if it was already triggered.
    pub fn trigger(&self, cause: ShutdownCause) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(cause);
            true
        })
    }

    /// The cause recorded by the first trigger, if any.
    pub fn cause(&self) -> Option<ShutdownCause> {
        *self.tx.borrow()
    }

    pub fn is_triggered(&self) -> bool {
        self.cause().is_some()
    }

    /// Get the number of active subscribers (tasks still listening).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a [`Shutdown`] scope.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<Option<ShutdownCause>>,
}

impl ShutdownSignal {
    /// Wait until the scope is triggered.
    ///
    /// Returns immediately if it already was. Returns `None` if every
    /// [`Shutdown`] handle was dropped without triggering, which also means
    /// nothing can keep the caller running.
    pub async fn recv(&mut self) -> Option<ShutdownCause> {
        match self.rx.wait_for(Option::is_some).await {
            Ok(cause) => *cause,
            Err(_) => None,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.rx.borrow().is_some()
    }
}
