//! LINCOLN process shell library.
//!
//! Loads layered configuration, installs logging and runs the selected mode
//! inside a cancellation scope driven by OS signals.

pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod modes;
pub mod observability;

pub use cli::Cli;
pub use config::LincolnConfig;
pub use error::{ConfigError, LifecycleError, ModeError};
pub use lifecycle::{Lifecycle, Shutdown, ShutdownCause, SignalListener};
pub use modes::Mode;
