//! Process configuration, read from the environment

use std::env;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://investment_board.db?mode=rwc";
pub const DEFAULT_APP_PASSWORD: &str = "mypassword123";
/// Large enough for base64 chart screenshots
pub const DEFAULT_BODY_LIMIT_MB: usize = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub app_password: String,
    pub body_limit_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            app_password: DEFAULT_APP_PASSWORD.to_string(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_MB * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Read PORT, DATABASE_URL, APP_PASSWORD and BODY_LIMIT_MB, falling back
    /// to the defaults above when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { name: "PORT", value })?,
            None => defaults.port,
        };

        let body_limit_bytes = match lookup("BODY_LIMIT_MB") {
            Some(value) => value
                .parse::<usize>()
                .ok()
                .filter(|mb| *mb > 0)
                .and_then(|mb| mb.checked_mul(1024 * 1024))
                .ok_or(ConfigError::InvalidValue {
                    name: "BODY_LIMIT_MB",
                    value,
                })?,
            None => defaults.body_limit_bytes,
        };

        Ok(Self {
            port,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            app_password: lookup("APP_PASSWORD").unwrap_or(defaults.app_password),
            body_limit_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.app_password, "mypassword123");
        assert_eq!(config.body_limit_bytes, 50 * 1024 * 1024);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_overrides_from_env() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://board@localhost/board"),
            ("APP_PASSWORD", "hunter2"),
            ("BODY_LIMIT_MB", "5"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "postgres://board@localhost/board");
        assert_eq!(config.app_password, "hunter2");
        assert_eq!(config.body_limit_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = AppConfig::from_lookup(lookup_from(&[("BODY_LIMIT_MB", "0")])).unwrap_err();
        assert!(err.to_string().contains("BODY_LIMIT_MB"));

        let err = AppConfig::from_lookup(lookup_from(&[("BODY_LIMIT_MB", "18446744073709551615")]))
            .unwrap_err();
        assert!(err.to_string().contains("BODY_LIMIT_MB"));
    }
}
