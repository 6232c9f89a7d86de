//! Top-level process roles.
//!
//! The process runs as either a `server` or an `agent`. Both currently start,
//! idle until the shutdown scope is triggered, and return.

pub mod agent;
pub mod server;

use std::fmt;
use std::str::FromStr;

use crate::config::LincolnConfig;
use crate::error::ModeError;
use crate::lifecycle::ShutdownSignal;

pub use agent::run_agent;
pub use server::run_server;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Server,
    Agent,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Server => "server",
            Mode::Agent => "agent",
        }
    }

    /// Run this mode until `shutdown` fires.
    pub async fn run(self, config: &LincolnConfig, shutdown: ShutdownSignal) -> anyhow::Result<()> {
        match self {
            Mode::Server => run_server(config, shutdown).await,
            Mode::Agent => run_agent(config, shutdown).await,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(Mode::Server),
            "agent" => Ok(Mode::Agent),
            other => Err(ModeError::Unknown(other.to_string())),
        }
    }
}
