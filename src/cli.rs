//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::modes::Mode;

pub const DEFAULT_CONFIG_PATH: &str = "configs/config.toml";

/// Parsed once at startup and never mutated.
#[derive(Debug, Clone, Parser)]
#[command(name = "lincoln")]
#[command(version, about = "LINCOLN server and agent", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Operation mode: 'server' or 'agent'
    #[arg(short, long, default_value = "server")]
    pub mode: Mode,

    /// Load and validate the config, print it as JSON and exit
    #[arg(long)]
    pub check_config: bool,
}
