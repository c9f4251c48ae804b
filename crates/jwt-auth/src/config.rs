//! Authentication configuration loaded from environment variables.
//!
//! `JWT_ISSUERS` holds the ordered issuer list as a JSON array:
//!
//! ```json
//! [
//!   {"ISSUER": "lms", "AUDIENCE": "lms-aud", "SECRET_KEY": "..."},
//!   {"ISSUER": "ecommerce", "AUDIENCE": "ecom-aud", "SECRET_KEY": "...", "ALGORITHM": "HS512"}
//! ]
//! ```
//!
//! The first entry is the fast-path issuer.

use crate::issuer::{is_supported_algorithm, IssuerConfig, IssuerRegistry, ValidationSettings};
use crate::observability::SwitchSet;
use common::secret::SecretString;
use jsonwebtoken::Algorithm;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Upper bound for `JWT_LEEWAY_SECONDS`.
pub const MAX_LEEWAY_SECONDS: u64 = 600;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub registry: IssuerRegistry,
    pub settings: ValidationSettings,
    pub switches: SwitchSet,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT_ISSUERS: {0}")]
    InvalidIssuers(String),

    #[error("Invalid boolean for {name}: {value}")]
    InvalidBool { name: String, value: String },

    #[error("Invalid JWT_LEEWAY_SECONDS: {0}")]
    InvalidLeeway(String),
}

/// One entry of `JWT_ISSUERS`.
#[derive(Deserialize)]
struct IssuerEntry {
    #[serde(rename = "ISSUER")]
    issuer: String,
    #[serde(rename = "AUDIENCE", default)]
    audience: String,
    #[serde(rename = "SECRET_KEY")]
    secret_key: SecretString,
    #[serde(rename = "ALGORITHM")]
    algorithm: Option<String>,
}

impl IssuerEntry {
    fn into_issuer(self, index: usize) -> Result<IssuerConfig, ConfigError> {
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::InvalidIssuers(format!(
                "entry {index} has an empty ISSUER"
            )));
        }

        let algorithm = match self.algorithm.as_deref() {
            None => Algorithm::HS256,
            Some(name) => {
                let algorithm = Algorithm::from_str(name).map_err(|_| {
                    ConfigError::InvalidIssuers(format!(
                        "entry {index} has unknown ALGORITHM {name}"
                    ))
                })?;
                if !is_supported_algorithm(algorithm) {
                    return Err(ConfigError::InvalidIssuers(format!(
                        "entry {index} uses {name}; only HS256, HS384 and HS512 are supported"
                    )));
                }
                algorithm
            }
        };

        Ok(IssuerConfig::new(self.issuer, self.audience, self.secret_key).with_algorithm(algorithm))
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let issuers_json = vars
            .get("JWT_ISSUERS")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_ISSUERS".to_string()))?;
        let registry = parse_issuers(issuers_json)?;

        let verify_audience = parse_bool(vars, "JWT_VERIFY_AUDIENCE", true)?;
        let verify_expiration = parse_bool(vars, "JWT_VERIFY_EXPIRATION", true)?;

        let leeway_seconds = match vars.get("JWT_LEEWAY_SECONDS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidLeeway(format!("{value}: {e}")))?,
            None => 0,
        };
        if leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(ConfigError::InvalidLeeway(format!(
                "{leeway_seconds} exceeds maximum of {MAX_LEEWAY_SECONDS}"
            )));
        }

        let settings = ValidationSettings::new(verify_audience)
            .with_verify_expiration(verify_expiration)
            .with_leeway(Duration::from_secs(leeway_seconds));

        let switches = vars
            .get("ECOMMERCE_ACTIVE_SWITCHES")
            .map(|list| SwitchSet::parse(list))
            .unwrap_or_default();

        Ok(AuthConfig {
            registry,
            settings,
            switches,
        })
    }
}

/// Parse the `JWT_ISSUERS` JSON array, preserving order.
pub fn parse_issuers(json: &str) -> Result<IssuerRegistry, ConfigError> {
    let entries: Vec<IssuerEntry> =
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidIssuers(e.to_string()))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| entry.into_issuer(index))
        .collect()
}

fn parse_bool(
    vars: &HashMap<String, String>,
    name: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = vars.get(name) else {
        return Ok(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name: name.to_string(),
            value: value.clone(),
        }),
    }
}
