//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject values nothing could use (empty hosts, port 0, zero drain timeout)
//! - Check the log filter the subscriber will install actually parses
//!
//! Pool sizes are not checked here: `max_open_conns = 0` means unlimited and
//! an idle count above the open limit is lowered by the loader.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LincolnConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use tracing_subscriber::EnvFilter;

use crate::config::schema::LincolnConfig;

/// A single semantic problem with a config value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted key, e.g. `database.port`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a loaded config for values that parse but make no sense.
pub fn validate_config(config: &LincolnConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let server = &config.server;
    let db = &config.database;

    for (field, value) in [
        ("server.host", &server.host),
        ("database.host", &db.host),
        ("database.user", &db.user),
        ("database.dbname", &db.dbname),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }

    if server.port == 0 {
        errors.push(ValidationError::new("server.port", "must be non-zero"));
    }
    if db.port == 0 {
        errors.push(ValidationError::new("database.port", "must be non-zero"));
    }

    if server.log_level.trim().is_empty() {
        errors.push(ValidationError::new("server.log_level", "must not be empty"));
    } else {
        let directive = server.log_directive();
        if let Err(e) = EnvFilter::try_new(&directive) {
            errors.push(ValidationError::new(
                "server.log_level",
                format!("invalid filter '{}': {}", directive, e),
            ));
        }
    }

    if server.shutdown_timeout.is_zero() {
        errors.push(ValidationError::new("server.shutdown_timeout", "must be non-zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
