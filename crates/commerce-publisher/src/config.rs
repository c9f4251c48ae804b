//! Publisher configuration loaded from environment variables.

use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default request timeout when `COMMERCE_API_TIMEOUT` is unset.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct PublisherConfig {
    /// Base URL of the commerce API. `None` disables publishing.
    pub api_url: Option<String>,

    /// Per-request timeout.
    pub api_timeout: Duration,

    /// Value of the `X-Edx-Api-Key` header.
    pub api_key: SecretString,
}

impl fmt::Debug for PublisherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublisherConfig")
            .field("api_url", &self.api_url)
            .field("api_timeout", &self.api_timeout)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum PublisherConfigError {
    #[error("Invalid COMMERCE_API_TIMEOUT: {0}")]
    InvalidTimeout(String),
}

impl PublisherConfig {
    /// Create a configuration with the default timeout.
    pub fn new(api_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            api_url: Some(api_url.into()),
            api_timeout: DEFAULT_API_TIMEOUT,
            api_key,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_api_timeout(mut self, timeout: Duration) -> Self {
        self.api_timeout = timeout;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, PublisherConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, PublisherConfigError> {
        // An empty URL counts as unset
        let api_url = vars
            .get("COMMERCE_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let api_timeout = match vars.get("COMMERCE_API_TIMEOUT") {
            Some(value) => parse_timeout(value)?,
            None => DEFAULT_API_TIMEOUT,
        };

        let api_key = SecretString::from(
            vars.get("EDX_API_KEY").cloned().unwrap_or_default(),
        );

        Ok(PublisherConfig {
            api_url,
            api_timeout,
            api_key,
        })
    }

    /// Endpoint for `course_id`: the base URL without trailing `/`, then
    /// `/courses/{course_id}/`.
    #[must_use]
    pub fn course_url(&self, course_id: &str) -> Option<String> {
        self.api_url
            .as_deref()
            .map(|base| format!("{}/courses/{course_id}/", base.trim_end_matches('/')))
    }

    pub(crate) fn api_key_header(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Seconds, fractional allowed, strictly positive.
fn parse_timeout(value: &str) -> Result<Duration, PublisherConfigError> {
    let seconds = value
        .trim()
        .parse::<f64>()
        .map_err(|e| PublisherConfigError::InvalidTimeout(format!("{value}: {e}")))?;

    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(PublisherConfigError::InvalidTimeout(format!(
            "{value}: must be greater than zero"
        )));
    }

    Duration::try_from_secs_f64(seconds)
        .map_err(|e| PublisherConfigError::InvalidTimeout(format!("{value}: {e}")))
}
