//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber from the loaded config
//! - Pick the output format from the deployment environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development and staging
//! - `RUST_LOG` wins over `server.log_level` when set

use std::io::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Environment, ServerConfig};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => LogFormat::Json,
            Environment::Development | Environment::Staging => LogFormat::Pretty,
        }
    }
}

/// Build the filter: `RUST_LOG` if present, otherwise the configured level
/// as scoped by [`ServerConfig::log_directive`].
pub fn build_filter(server: &ServerConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(server.log_directive()))
}

/// Install the global subscriber.
///
/// Returns an error if a subscriber is already installed, which callers may
/// ignore (tests install one per process).
pub fn init_logging(
    server: &ServerConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = build_filter(server);
    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::for_environment(server.environment) {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(std::io::stdout().is_terminal()),
            )
            .try_init(),
    }
}
