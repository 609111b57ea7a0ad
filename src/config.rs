use thiserror::Error;

pub const DEFAULT_POOL_MAX_SIZE: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub pool_max_size: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let pool_max_size = match lookup("DB_POOL_MAX_SIZE") {
            None => DEFAULT_POOL_MAX_SIZE,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        key: "DB_POOL_MAX_SIZE",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    })
                }
                Ok(size) => size,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: "DB_POOL_MAX_SIZE",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
        };

        Ok(AppConfig {
            database_url,
            pool_max_size,
        })
    }
}
