//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the process.
//! Every field has a default so a config file only needs the keys it changes.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::duration;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct LincolnConfig {
    /// Process-level settings (listen address, environment, logging).
    pub server: ServerConfig,

    /// Database connection parameters.
    pub database: DatabaseConfig,
}

impl LincolnConfig {
    /// Copy of the config with secrets masked, safe to log or print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.database.password.is_empty() {
            copy.database.password = "********".to_string();
        }
        copy
    }
}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to listen on.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Deployment environment; selects the log format.
    pub environment: Environment,

    /// Log filter directive (e.g. "info", "debug", "lincoln=trace").
    pub log_level: String,

    /// How long a mode may take to return once shutdown has begun.
    #[serde(with = "duration")]
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// `host:port` as a single string.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Filter directive the logger installs for `log_level`.
    ///
    /// A bare level such as `info` is scoped to this crate so dependency noise
    /// stays out; anything containing a directive is used as written.
    pub fn log_directive(&self) -> String {
        let level = self.log_level.trim();
        if level.contains('=') || level.contains(',') {
            level.to_string()
        } else {
            format!("lincoln={}", level)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_level: "info".to_string(),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "unknown environment '{}', expected development, staging or production",
                other
            )),
        }
    }
}

/// Database connection parameters.
///
/// Loaded and validated at startup; nothing opens a connection with them yet.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,

    /// Never logged; see [`LincolnConfig::redacted`].
    pub password: String,

    pub dbname: String,
    pub sslmode: SslMode,

    /// Upper bound on open connections in the pool; `0` means unlimited.
    pub max_open_conns: u32,

    /// Connections kept idle. Lowered to `max_open_conns` when it is above a
    /// finite open limit.
    pub max_idle_conns: u32,

    /// Maximum age of a pooled connection.
    #[serde(with = "duration")]
    pub conn_max_lifetime: Duration,
}

impl DatabaseConfig {
    /// `user@host:port/dbname`, without the password.
    pub fn target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.dbname)
    }

    /// Cap `max_idle_conns` at a finite `max_open_conns`.
    ///
    /// Returns the previous idle value when it was lowered.
    pub fn clamp_idle_conns(&mut self) -> Option<u32> {
        if self.max_open_conns > 0 && self.max_idle_conns > self.max_open_conns {
            let previous = self.max_idle_conns;
            self.max_idle_conns = self.max_open_conns;
            return Some(previous);
        }
        None
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            dbname: "lincoln".to_string(),
            sslmode: SslMode::Disable,
            max_open_conns: 25,
            max_idle_conns: 5,
            conn_max_lifetime: Duration::from_secs(5 * 60),
        }
    }
}

/// PostgreSQL `sslmode` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    #[default]
    Disable,
    Allow,
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl FromStr for SslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disable" => Ok(SslMode::Disable),
            "allow" => Ok(SslMode::Allow),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            "verify-ca" => Ok(SslMode::VerifyCa),
            "verify-full" => Ok(SslMode::VerifyFull),
            other => Err(format!("unknown sslmode '{}'", other)),
        }
    }
}
