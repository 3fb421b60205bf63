use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),
}

/// Connection settings for the store backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the API prefix, e.g. `https://shop.example.com/api`.
    pub base_url: String,
    /// Email of the signed-in customer, forwarded as the `userEmail` query
    /// parameter on checkout and order-history calls.
    pub user_email: String,
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, user_email: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            user_email: user_email.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reads `STORE_API_URL` and `STORE_USER_EMAIL` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("STORE_API_URL").map_err(|_| ConfigError::MissingVar("STORE_API_URL"))?;
        let user_email = env::var("STORE_USER_EMAIL")
            .map_err(|_| ConfigError::MissingVar("STORE_USER_EMAIL"))?;
        Ok(Self::new(base_url, user_email))
    }
}
