//! Runtime configuration from environment variables (`.env` honoured via dotenvy).

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_QUOTE_BASE_URL: &str = "https://cloud.iexapis.com/stable";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// Unset means the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: Vec<u8>,
    pub quote_api_key: String,
    pub quote_base_url: String,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            let value = lookup(key).ok_or(ConfigError::Missing(key))?;
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(key));
            }
            Ok(value)
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: optional("DATABASE_URL"),
            jwt_secret: required("JWT_SECRET")?.into_bytes(),
            quote_api_key: required("API_KEY")?,
            quote_base_url: optional("QUOTE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_QUOTE_BASE_URL.to_string()),
        })
    }
}
