//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs, Default impls)
//!     → config file (TOML) parsed by loader.rs
//!     → env.rs overrides (LINCOLN_<SECTION>_<KEY>)
//!     → validation.rs (semantic checks)
//!     → LincolnConfig (validated, immutable)
//!     → passed by reference to logging, lifecycle and modes
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod duration;
pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::{EnvSource, ProcessEnv};
pub use loader::{load_config, load_config_from_str};
pub use schema::{DatabaseConfig, Environment, LincolnConfig, ServerConfig, SslMode};
