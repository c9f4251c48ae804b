//! Builder patterns for test data construction
//!
//! Provides a fluent API for creating test claims and HMAC-signed tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Map, Value};

use crate::fixtures::{FAST_PATH_ISSUER, TEST_AUDIENCE};

/// Builder for creating test JWT claims
///
/// Defaults mirror the tokens issued by the fast-path issuer: `iss`,
/// `username`, `email`, `iat` = now and `exp` = now + 5 seconds.
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .issued_by("test-issuer-2")
///     .expires_in(-60)
///     .sign("test-secret-key-2");
/// ```
pub struct TestTokenBuilder {
    iss: Option<Value>,
    username: String,
    email: String,
    iat: Option<i64>,
    exp: Option<i64>,
    aud: Option<String>,
    algorithm: Algorithm,
    extra: Map<String, Value>,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            iss: Some(json!(FAST_PATH_ISSUER)),
            username: "test-user".to_string(),
            email: "test-user@example.com".to_string(),
            iat: Some(now.timestamp()),
            exp: Some((now + Duration::seconds(5)).timestamp()),
            aud: None,
            algorithm: Algorithm::HS256,
            extra: Map::new(),
        }
    }

    /// Set the `iss` claim
    pub fn issued_by(mut self, issuer: &str) -> Self {
        self.iss = Some(json!(issuer));
        self
    }

    /// Set `iss` to an arbitrary JSON value (e.g. a number)
    pub fn with_raw_issuer(mut self, issuer: Value) -> Self {
        self.iss = Some(issuer);
        self
    }

    /// Drop the `iss` claim
    pub fn without_issuer(mut self) -> Self {
        self.iss = None;
        self
    }

    pub fn for_user(mut self, username: &str, email: &str) -> Self {
        self.username = username.to_string();
        self.email = email.to_string();
        self
    }

    /// Set expiration in seconds from now (negative for an expired token)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = Some((Utc::now() + Duration::seconds(seconds)).timestamp());
        self
    }

    pub fn without_expiration(mut self) -> Self {
        self.exp = None;
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = Some(timestamp);
        self
    }

    pub fn without_issued_at(mut self) -> Self {
        self.iat = None;
        self
    }

    /// Set the `aud` claim
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.aud = Some(audience.to_string());
        self
    }

    /// Set `aud` to the shared fixture audience
    pub fn with_test_audience(self) -> Self {
        self.with_audience(TEST_AUDIENCE)
    }

    /// Add a domain claim
    pub fn with_claim(mut self, name: &str, value: Value) -> Self {
        self.extra.insert(name.to_string(), value);
        self
    }

    /// Sign with a different HMAC algorithm
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the claims as a JSON value
    pub fn build(&self) -> Value {
        let mut claims = Map::new();
        if let Some(iss) = &self.iss {
            claims.insert("iss".to_string(), iss.clone());
        }
        claims.insert("username".to_string(), json!(self.username));
        claims.insert("email".to_string(), json!(self.email));
        if let Some(iat) = self.iat {
            claims.insert("iat".to_string(), json!(iat));
        }
        if let Some(exp) = self.exp {
            claims.insert("exp".to_string(), json!(exp));
        }
        if let Some(aud) = &self.aud {
            claims.insert("aud".to_string(), json!(aud));
        }
        for (name, value) in &self.extra {
            claims.insert(name.clone(), value.clone());
        }
        Value::Object(claims)
    }

    /// Build the claims and sign them with `secret`
    pub fn sign(&self, secret: &str) -> String {
        encode(
            &Header::new(self.algorithm),
            &self.build(),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("HMAC signing of test claims should not fail")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
