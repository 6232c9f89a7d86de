//! Configuration loading from disk.
//!
//! Layers are applied in order: defaults, then the TOML file, then
//! environment overrides. Validation runs on the merged result, after which
//! the idle pool size is capped at a finite open limit.

use std::fs;
use std::path::Path;

use crate::config::env::{apply_env_overrides, EnvSource};
use crate::config::schema::LincolnConfig;
use crate::config::validation::validate_config;
use crate::error::ConfigError;

/// Load, merge and validate configuration from a TOML file.
pub fn load_config(path: &Path, env: &dyn EnvSource) -> Result<LincolnConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    load_config_from_str(&content, &path.display().to_string(), env)
}

/// Load, merge and validate configuration from an in-memory TOML string.
pub fn load_config_from_str(
    content: &str,
    source_name: &str,
    env: &dyn EnvSource,
) -> Result<LincolnConfig, ConfigError> {
    // Missing tables and keys fall back to `Default` via `#[serde(default)]`.
    let mut config: LincolnConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        source_name: source_name.to_string(),
        source,
    })?;

    apply_env_overrides(&mut config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    if let Some(requested) = config.database.clamp_idle_conns() {
        tracing::warn!(
            requested,
            max_open_conns = config.database.max_open_conns,
            "database.max_idle_conns exceeds max_open_conns, lowering it"
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{Environment, SslMode};
    use std::collections::HashMap;
    use std::time::Duration;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = load_config_from_str("", "config.toml", &no_env()).unwrap();
        assert_eq!(config, LincolnConfig::default());
    }

    #[test]
    fn test_present_keys_override_defaults() {
        let content = r#"
[server]
port = 9090
environment = "staging"

[database]
dbname = "lincoln_test"
sslmode = "verify-full"
conn_max_lifetime = "90s"
"#;
        let config = load_config_from_str(content, "config.toml", &no_env()).unwrap();
        let defaults = LincolnConfig::default();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.environment, Environment::Staging);
        assert_eq!(config.database.dbname, "lincoln_test");
        assert_eq!(config.database.sslmode, SslMode::VerifyFull);
        assert_eq!(config.database.conn_max_lifetime, Duration::from_secs(90));

        assert_eq!(config.server.host, defaults.server.host);
        assert_eq!(config.server.log_level, defaults.server.log_level);
        assert_eq!(config.database.host, defaults.database.host);
        assert_eq!(config.database.max_open_conns, defaults.database.max_open_conns);
    }

    #[test]
    fn test_env_beats_file() {
        let content = "[server]\nport = 9090\n";
        let env: HashMap<String, String> =
            [("LINCOLN_SERVER_PORT".to_string(), "7070".to_string())].into();

        let config = load_config_from_str(content, "config.toml", &env).unwrap();
        assert_eq!(config.server.port, 7070);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let content = "[server]\nprot = 9090\n";
        let result = load_config_from_str(content, "config.toml", &no_env());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_invalid_toml_syntax() {
        let result = load_config_from_str("[server\nport = ", "config.toml", &no_env());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let result = load_config_from_str("[server]\nport = \"eighty\"\n", "config.toml", &no_env());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_validation_runs_after_merge() {
        // Valid in the file, broken by the environment.
        let env: HashMap<String, String> =
            [("LINCOLN_SERVER_PORT".to_string(), "0".to_string())].into();
        let result = load_config_from_str("", "config.toml", &env);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_open_conns_means_unlimited() {
        let content = "[database]\nmax_open_conns = 0\nmax_idle_conns = 40\n";
        let config = load_config_from_str(content, "config.toml", &no_env()).unwrap();

        assert_eq!(config.database.max_open_conns, 0);
        assert_eq!(config.database.max_idle_conns, 40);
    }

    #[test]
    fn test_idle_above_open_is_lowered() {
        let content = "[database]\nmax_open_conns = 4\nmax_idle_conns = 10\n";
        let config = load_config_from_str(content, "config.toml", &no_env()).unwrap();

        assert_eq!(config.database.max_open_conns, 4);
        assert_eq!(config.database.max_idle_conns, 4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/lincoln/config.toml"), &no_env());
        match result {
            Err(ConfigError::Io { path, .. }) => {
                assert_eq!(path, Path::new("/nonexistent/lincoln/config.toml"));
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
