//! LINCOLN entry point.
//!
//! # Startup Order
//!
//! ```text
//!   CLI flags ──▶ config (defaults → file → env) ──▶ logging
//!                                                     │
//!                                                     ▼
//!   SIGINT/SIGTERM ──▶ signal listener ──▶ Shutdown scope
//!                                                     │
//!                                                     ▼
//!                          Lifecycle ──▶ server | agent ──▶ exit
//! ```
//!
//! Any config or mode failure is fatal and exits with status 1.

use std::process::ExitCode;

use clap::Parser;

use lincoln::config::{load_config, ProcessEnv};
use lincoln::observability::init_logging;
use lincoln::{Cli, Lifecycle, Shutdown, SignalListener};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is configured from the file, so failures before this point go
    // straight to stderr.
    let config = match load_config(&cli.config, &ProcessEnv) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("lincoln: error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.check_config {
        return match serde_json::to_string_pretty(&config.redacted()) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("lincoln: error rendering config: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = init_logging(&config.server) {
        eprintln!("lincoln: error setting up logger: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = %cli.mode,
        config = %cli.config.display(),
        environment = %config.server.environment,
        max_open_conns = config.database.max_open_conns,
        max_idle_conns = config.database.max_idle_conns,
        "lincoln starting"
    );

    let shutdown = Shutdown::new();
    if let Err(e) = SignalListener::install(shutdown.clone()) {
        tracing::error!(error = %e, "Fatal startup error");
        return ExitCode::FAILURE;
    }

    let lifecycle = Lifecycle::new(shutdown);
    match lifecycle.run(cli.mode, &config).await {
        Ok(cause) => {
            tracing::info!(cause = %cause, "Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(mode = %cli.mode, error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
