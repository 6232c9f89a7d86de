//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Install logging → Install signal listener → Dispatch
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger (first signal only)
//!
//! Dispatch (controller.rs):
//!     Running → scope triggered → ShuttingDown → mode returns → Stopped
//! ```
//!
//! # Design Decisions
//! - One cancellation scope for the whole process
//! - Shutdown has a deadline: a mode that does not return in time is an error

pub mod controller;
pub mod shutdown;
pub mod signals;
pub mod state;

pub use controller::Lifecycle;
pub use shutdown::{OsSignal, Shutdown, ShutdownCause, ShutdownSignal};
pub use signals::SignalListener;
pub use state::{LifecycleState, StateTracker};
