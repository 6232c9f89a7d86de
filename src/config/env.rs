//! Environment variable overrides.
//!
//! Every config key can be overridden by `LINCOLN_<SECTION>_<KEY>`, for example
//! `LINCOLN_SERVER_PORT=9000` or `LINCOLN_DATABASE_CONN_MAX_LIFETIME=10m`.
//! Overrides are applied after the file, so they win over both file values and
//! defaults. A variable that is set but empty is ignored; one that is not
//! valid unicode is an error.

use std::collections::HashMap;
use std::ffi::OsString;
use std::str::FromStr;

use crate::config::duration;
use crate::config::schema::LincolnConfig;
use crate::error::ConfigError;

/// Prefix shared by all override variables.
pub const ENV_PREFIX: &str = "LINCOLN";

/// Source of environment values.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<OsString>;
}

/// Reads from the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<OsString> {
        HashMap::get(self, key).map(OsString::from)
    }
}

impl EnvSource for HashMap<String, OsString> {
    fn get(&self, key: &str) -> Option<OsString> {
        HashMap::get(self, key).cloned()
    }
}

/// Build the variable name for a `section.key` pair.
pub fn env_var_name(section: &str, key: &str) -> String {
    format!("{}_{}_{}", ENV_PREFIX, section, key).to_uppercase()
}

/// Apply every override present in `env` to `config`.
pub fn apply_env_overrides(
    config: &mut LincolnConfig,
    env: &dyn EnvSource,
) -> Result<(), ConfigError> {
    let mut overrides = Overrides { env, applied: 0 };

    let server = &mut config.server;
    overrides.string("server", "host", &mut server.host)?;
    overrides.parsed("server", "port", &mut server.port)?;
    overrides.parsed("server", "environment", &mut server.environment)?;
    overrides.string("server", "log_level", &mut server.log_level)?;
    overrides.duration("server", "shutdown_timeout", &mut server.shutdown_timeout)?;

    let db = &mut config.database;
    overrides.string("database", "host", &mut db.host)?;
    overrides.parsed("database", "port", &mut db.port)?;
    overrides.string("database", "user", &mut db.user)?;
    overrides.string("database", "password", &mut db.password)?;
    overrides.string("database", "dbname", &mut db.dbname)?;
    overrides.parsed("database", "sslmode", &mut db.sslmode)?;
    overrides.parsed("database", "max_open_conns", &mut db.max_open_conns)?;
    overrides.parsed("database", "max_idle_conns", &mut db.max_idle_conns)?;
    overrides.duration("database", "conn_max_lifetime", &mut db.conn_max_lifetime)?;

    if overrides.applied > 0 {
        tracing::debug!(count = overrides.applied, "Applied environment overrides");
    }
    Ok(())
}

struct Overrides<'a> {
    env: &'a dyn EnvSource,
    applied: usize,
}

impl Overrides<'_> {
    fn lookup(&mut self, section: &str, key: &str) -> Result<Option<(String, String)>, ConfigError> {
        let var = env_var_name(section, key);
        let raw = match self.env.get(&var) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };
        let value = raw.into_string().map_err(|raw| ConfigError::Env {
            value: raw.to_string_lossy().into_owned(),
            var: var.clone(),
            reason: "not valid unicode".to_string(),
        })?;
        self.applied += 1;
        Ok(Some((var, value)))
    }

    fn string(&mut self, section: &str, key: &str, slot: &mut String) -> Result<(), ConfigError> {
        if let Some((_, value)) = self.lookup(section, key)? {
            *slot = value;
        }
        Ok(())
    }

    fn parsed<T>(&mut self, section: &str, key: &str, slot: &mut T) -> Result<(), ConfigError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        if let Some((var, value)) = self.lookup(section, key)? {
            *slot = value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
                var,
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    fn duration(
        &mut self,
        section: &str,
        key: &str,
        slot: &mut std::time::Duration,
    ) -> Result<(), ConfigError> {
        if let Some((var, value)) = self.lookup(section, key)? {
            *slot = duration::parse(&value).map_err(|reason| ConfigError::Env {
                var,
                value: value.clone(),
                reason,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{Environment, SslMode};
    use std::time::Duration;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_var_name_format() {
        assert_eq!(env_var_name("server", "port"), "LINCOLN_SERVER_PORT");
        assert_eq!(
            env_var_name("database", "conn_max_lifetime"),
            "LINCOLN_DATABASE_CONN_MAX_LIFETIME"
        );
    }

    #[test]
    fn test_overrides_typed_fields() {
        let mut config = LincolnConfig::default();
        let vars = env(&[
            ("LINCOLN_SERVER_PORT", "9000"),
            ("LINCOLN_SERVER_ENVIRONMENT", "production"),
            ("LINCOLN_DATABASE_SSLMODE", "require"),
            ("LINCOLN_DATABASE_CONN_MAX_LIFETIME", "1h"),
            ("LINCOLN_DATABASE_PASSWORD", "s3cret"),
        ]);

        apply_env_overrides(&mut config, &vars).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.environment, Environment::Production);
        assert_eq!(config.database.sslmode, SslMode::Require);
        assert_eq!(config.database.conn_max_lifetime, Duration::from_secs(3600));
        assert_eq!(config.database.password, "s3cret");
        // untouched
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.max_open_conns, 25);
    }

    #[test]
    fn test_empty_env_changes_nothing() {
        let mut config = LincolnConfig::default();
        apply_env_overrides(&mut config, &HashMap::<String, String>::new()).unwrap();
        assert_eq!(config, LincolnConfig::default());
    }

    #[test]
    fn test_unparseable_value_names_variable() {
        let mut config = LincolnConfig::default();
        let vars = env(&[("LINCOLN_DATABASE_PORT", "not-a-port")]);

        match apply_env_overrides(&mut config, &vars) {
            Err(ConfigError::Env { var, value, .. }) => {
                assert_eq!(var, "LINCOLN_DATABASE_PORT");
                assert_eq!(value, "not-a-port");
            }
            other => panic!("Expected Env error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut config = LincolnConfig::default();
        config.server.port = 9000;
        let vars = env(&[
            ("LINCOLN_SERVER_PORT", ""),
            ("LINCOLN_SERVER_HOST", ""),
            ("LINCOLN_DATABASE_CONN_MAX_LIFETIME", ""),
        ]);

        apply_env_overrides(&mut config, &vars).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.conn_max_lifetime, Duration::from_secs(300));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_value_rejected() {
        use std::os::unix::ffi::OsStringExt;

        let mut config = LincolnConfig::default();
        let vars: HashMap<String, OsString> = [(
            "LINCOLN_DATABASE_USER".to_string(),
            OsString::from_vec(vec![b'a', 0xff, b'b']),
        )]
        .into();

        match apply_env_overrides(&mut config, &vars) {
            Err(ConfigError::Env { var, reason, .. }) => {
                assert_eq!(var, "LINCOLN_DATABASE_USER");
                assert_eq!(reason, "not valid unicode");
            }
            other => panic!("Expected Env error, got {:?}", other),
        }
        assert_eq!(config.database.user, "postgres");
    }

    #[test]
    fn test_bad_duration_rejected() {
        let mut config = LincolnConfig::default();
        let vars = env(&[("LINCOLN_SERVER_SHUTDOWN_TIMEOUT", "soon")]);
        assert!(matches!(
            apply_env_overrides(&mut config, &vars),
            Err(ConfigError::Env { .. })
        ));
    }
}
