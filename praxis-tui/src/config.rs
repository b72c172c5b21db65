//! Environment configuration

use std::env;
use std::time::Duration;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the practice backend.
    pub base_url: String,
    /// Bearer token produced by an external authentication flow, if the
    /// deployment requires one.
    pub bearer_token: Option<String>,
    /// Rows per table page.
    pub page_size: usize,
    /// Request timeout.
    pub timeout: Duration,
}

/// Errors while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The backend URL is missing.
    #[error("PRAXIS_BASE_URL is not set")]
    MissingBaseUrl,

    /// A numeric variable did not parse.
    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// `PRAXIS_BASE_URL` is required; `PRAXIS_TOKEN`, `PRAXIS_PAGE_SIZE`
    /// and `PRAXIS_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("PRAXIS_BASE_URL").map_err(|_| ConfigError::MissingBaseUrl)?;
        let bearer_token = env::var("PRAXIS_TOKEN").ok().filter(|t| !t.is_empty());

        let page_size = match env::var("PRAXIS_PAGE_SIZE") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: "PRAXIS_PAGE_SIZE",
                value,
            })?,
            Err(_) => 20,
        };

        let timeout_secs: u64 = match env::var("PRAXIS_TIMEOUT_SECS") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: "PRAXIS_TIMEOUT_SECS",
                value,
            })?,
            Err(_) => 30,
        };

        Ok(Self {
            base_url,
            bearer_token,
            page_size: page_size.max(1),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
