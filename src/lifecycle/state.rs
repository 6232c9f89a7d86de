//! Lifecycle state machine.
//!
//! `Starting → Running → ShuttingDown → Stopped`. Each transition moves exactly
//! one step forward; skipping or going back is refused.

use std::fmt;

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Starting,
    Running,
    ShuttingDown,
    Stopped,
}

impl LifecycleState {
    /// The only state this one may move to.
    pub fn next(self) -> Option<LifecycleState> {
        match self {
            LifecycleState::Starting => Some(LifecycleState::Running),
            LifecycleState::Running => Some(LifecycleState::ShuttingDown),
            LifecycleState::ShuttingDown => Some(LifecycleState::Stopped),
            LifecycleState::Stopped => None,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Starting => "starting",
            LifecycleState::Running => "running",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Publishes the current [`LifecycleState`] to any number of observers.
#[derive(Debug)]
pub struct StateTracker {
    tx: watch::Sender<LifecycleState>,
}

impl StateTracker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Starting);
        Self { tx }
    }

    pub fn current(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }

    /// Move to `next`. Anything but the single next step is ignored and
    /// returns `false`.
    pub fn advance(&self, next: LifecycleState) -> bool {
        self.tx.send_if_modified(|current| {
            if current.next() != Some(next) {
                return false;
            }
            tracing::debug!(from = %current, to = %next, "Lifecycle transition");
            *current = next;
            true
        })
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}
