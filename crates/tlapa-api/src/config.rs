//! Application configuration.
//!
//! Configuration is loaded from environment variables (a local `.env` is
//! read first) with fallback to defaults.
//!
//! ```text
//! DATABASE_URL             required
//! DB_MAX_CONNECTIONS       default 10
//! DB_MIN_CONNECTIONS       default 1
//! DB_ACQUIRE_TIMEOUT_SECS  default 30
//! DB_LOCK_TIMEOUT_MS       unset = wait for row locks indefinitely
//! DB_RUN_MIGRATIONS        default true
//! ```

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tlapa_db::DbConfig;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Pool size limits
    pub max_connections: u32,
    pub min_connections: u32,

    /// How long a request waits for a pooled connection
    pub acquire_timeout: Duration,

    /// PostgreSQL `lock_timeout` for row locks taken by sales
    pub lock_timeout: Option<Duration>,

    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired("DATABASE_URL".to_string()))?;

        let config = AppConfig {
            database_url,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", 1)?,
            acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 30)?),
            lock_timeout: parse_optional::<u64, _>(&lookup, "DB_LOCK_TIMEOUT_MS")?.map(Duration::from_millis),
            run_migrations: parse_or(&lookup, "DB_RUN_MIGRATIONS", true)?,
        };

        if config.min_connections > config.max_connections {
            return Err(ConfigError::InvalidValue("DB_MIN_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Pool settings for [`tlapa_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_url.clone())
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .lock_timeout(self.lock_timeout)
            .run_migrations(self.run_migrations)
    }

    /// The connection string with credentials removed, for logging.
    pub fn redacted_url(&self) -> String {
        match (self.database_url.find("://"), self.database_url.rfind('@')) {
            (Some(scheme), Some(at)) if at > scheme => {
                format!("{}://***{}", &self.database_url[..scheme], &self.database_url[at..])
            }
            _ => self.database_url.clone(),
        }
    }
}

fn parse_optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        _ => Ok(None),
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_optional(lookup, key)?.unwrap_or(default))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/tlapa")])).unwrap();

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
        assert_eq!(config.lock_timeout, None);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/tlapa"),
            ("DB_MAX_CONNECTIONS", "25"),
            ("DB_LOCK_TIMEOUT_MS", "2500"),
            ("DB_RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.max_connections, 25);
        assert_eq!(config.lock_timeout, Some(Duration::from_millis(2500)));
        assert!(!config.run_migrations);

        let db = config.db_config();
        assert_eq!(db.max_connections, 25);
        assert_eq!(db.lock_timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_missing_url() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(ref key) if key == "DATABASE_URL"));

        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }

    #[test]
    fn test_invalid_values() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/tlapa"),
            ("DB_MAX_CONNECTIONS", "many"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for DB_MAX_CONNECTIONS");

        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/tlapa"),
            ("DB_MAX_CONNECTIONS", "2"),
            ("DB_MIN_CONNECTIONS", "5"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for DB_MIN_CONNECTIONS");
    }

    #[test]
    fn test_redacted_url() {
        let config =
            AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://tlapa:secret@db:5432/tlapa")])).unwrap();
        assert_eq!(config.redacted_url(), "postgres://***@db:5432/tlapa");

        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/tlapa")])).unwrap();
        assert_eq!(config.redacted_url(), "postgres://localhost/tlapa");
    }
}
