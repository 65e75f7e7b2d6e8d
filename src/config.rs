use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use derive_more::Display;
use dotenvy::dotenv;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum ConfigError {
    #[display(fmt = "{} must be set", _0)]
    Missing(&'static str),
    #[display(fmt = "{} has an invalid value: {:?}", key, value)]
    Invalid { key: &'static str, value: String },
    #[display(fmt = "HEALTHCHECK_RETRIES must be at least 1")]
    ZeroRetries,
    #[display(fmt = "HEALTHCHECK_TIMEOUT must be at least 1 second")]
    ZeroTimeout,
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct DatabaseSettings {
    /// Full connection URL; takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

// Keeps the password out of log output.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Readiness polling parameters used while waiting for the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthCheckSettings {
    pub interval: Duration,
    pub timeout: Duration,
    pub retries: u32,
}

impl Default for HealthCheckSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(5),
            retries: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseSettings,
    pub backend_port: u16,
    pub health_check: HealthCheckSettings,
    pub api_prefix: String,
    pub project_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| -> Result<String, ConfigError> {
            match (&url, lookup(key)) {
                (_, Some(value)) => Ok(value),
                (Some(_), None) => Ok(String::new()),
                (None, None) => Err(ConfigError::Missing(key)),
            }
        };

        let database = DatabaseSettings {
            host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(&lookup, "DB_PORT", 3306)?,
            user: required("DB_USER")?,
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            name: required("DB_NAME")?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            url,
        };

        let defaults = HealthCheckSettings::default();
        let health_check = HealthCheckSettings {
            interval: Duration::from_secs(parse_or(
                &lookup,
                "HEALTHCHECK_INTERVAL",
                defaults.interval.as_secs(),
            )?),
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "HEALTHCHECK_TIMEOUT",
                defaults.timeout.as_secs(),
            )?),
            retries: parse_or(&lookup, "HEALTHCHECK_RETRIES", defaults.retries)?,
        };
        if health_check.retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if health_check.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            database,
            backend_port: parse_or(&lookup, "BACKEND_PORT", 8000)?,
            health_check,
            api_prefix: lookup("API_V1_STR").unwrap_or_else(|| "/api/v1".to_string()),
            project_name: lookup("PROJECT_NAME").unwrap_or_else(|| "Attendance API".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_required_parts_are_set() {
        let config = config_from(&[("DB_USER", "app"), ("DB_NAME", "attendance")]).unwrap();

        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.backend_port, 8000);
        assert_eq!(config.api_prefix, "/api/v1");
        assert_eq!(config.health_check, HealthCheckSettings::default());
    }

    #[test]
    fn database_url_makes_parts_optional() {
        let config = config_from(&[("DATABASE_URL", "mysql://u:p@db:3306/app")]).unwrap();
        assert_eq!(config.database.url.as_deref(), Some("mysql://u:p@db:3306/app"));
    }

    #[test]
    fn missing_database_name_is_reported() {
        let err = config_from(&[("DB_USER", "app")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DB_NAME"));
    }

    #[test]
    fn health_check_values_are_read_in_seconds() {
        let config = config_from(&[
            ("DB_USER", "app"),
            ("DB_NAME", "attendance"),
            ("HEALTHCHECK_INTERVAL", "3"),
            ("HEALTHCHECK_TIMEOUT", "1"),
            ("HEALTHCHECK_RETRIES", "7"),
        ])
        .unwrap();

        assert_eq!(config.health_check.interval, Duration::from_secs(3));
        assert_eq!(config.health_check.timeout, Duration::from_secs(1));
        assert_eq!(config.health_check.retries, 7);
    }

    #[test]
    fn zero_retries_is_rejected() {
        let err = config_from(&[
            ("DB_USER", "app"),
            ("DB_NAME", "attendance"),
            ("HEALTHCHECK_RETRIES", "0"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::ZeroRetries);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = config_from(&[
            ("DB_USER", "app"),
            ("DB_NAME", "attendance"),
            ("HEALTHCHECK_TIMEOUT", "0"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::ZeroTimeout);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = config_from(&[
            ("DB_USER", "app"),
            ("DB_NAME", "attendance"),
            ("BACKEND_PORT", "http"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BACKEND_PORT", .. }));
    }

    #[test]
    fn debug_output_hides_password() {
        let config = config_from(&[
            ("DB_USER", "app"),
            ("DB_NAME", "attendance"),
            ("DB_PASSWORD", "hunter2"),
        ])
        .unwrap();
        assert!(!format!("{:?}", config.database).contains("hunter2"));
    }
}
