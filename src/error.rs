//! Error types for the process shell.
//!
//! Every error here is terminal: the binary logs it and exits non-zero.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::validation::ValidationError;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML or does not match the schema.
    #[error("failed to parse config file '{source_name}': {source}")]
    Parse {
        source_name: String,
        source: toml::de::Error,
    },

    /// An environment override could not be converted to the field's type.
    #[error("invalid value '{value}' for environment variable {var}: {reason}")]
    Env {
        var: String,
        value: String,
        reason: String,
    },

    /// Semantic validation failed with one or more problems.
    #[error("config validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error returned when parsing a `--mode` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("invalid mode '{0}', use 'server' or 'agent'")]
    Unknown(String),
}

/// Errors raised by the lifecycle controller.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The OS refused to install a signal handler.
    #[error("failed to register {signal} handler: {source}")]
    SignalRegistration {
        signal: &'static str,
        source: std::io::Error,
    },

    /// The mode function returned an error.
    #[error("error in {mode}: {source:#}")]
    Mode {
        mode: &'static str,
        source: anyhow::Error,
    },

    /// The mode function did not return within the drain deadline.
    #[error("{mode} did not stop within {timeout:?} of shutdown")]
    ShutdownTimeout {
        mode: &'static str,
        timeout: Duration,
    },
}
