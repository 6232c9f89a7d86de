//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems emit tracing events:
//!     → logging.rs (EnvFilter + fmt layer)
//!     → stdout (pretty for development, JSON for production)
//! ```

pub mod logging;

pub use logging::{init_logging, LogFormat};
