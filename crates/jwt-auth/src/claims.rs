//! Decoded JWT claim set.
//!
//! Claims are kept as a JSON object so that domain claims (`username`,
//! `email`, ...) reach the caller untouched. User-identifying values are
//! redacted in Debug output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Claims whose values are hidden from Debug output.
const REDACTED_CLAIMS: &[&str] = &["username", "email", "sub"];

/// Claims of a validated token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenClaims(Map<String, Value>);

impl fmt::Debug for TokenClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.0 {
            if REDACTED_CLAIMS.contains(&name.as_str()) {
                map.entry(name, &"[REDACTED]");
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

impl From<Map<String, Value>> for TokenClaims {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

impl TokenClaims {
    /// Get a claim by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Issuer (`iss`).
    #[must_use]
    pub fn iss(&self) -> Option<&str> {
        self.get("iss").and_then(Value::as_str)
    }

    /// Expiration (`exp`), epoch seconds.
    #[must_use]
    pub fn exp(&self) -> Option<i64> {
        self.get("exp").and_then(Value::as_i64)
    }

    /// Issued-at (`iat`), epoch seconds, when it is an integer.
    #[must_use]
    pub fn iat(&self) -> Option<i64> {
        self.get("iat").and_then(Value::as_i64)
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.get("username").and_then(Value::as_str)
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.get("email").and_then(Value::as_str)
    }

    /// True when every entry of `expected` is present here with an equal value.
    #[must_use]
    pub fn contains_subset(&self, expected: &Map<String, Value>) -> bool {
        expected
            .iter()
            .all(|(name, value)| self.0.get(name) == Some(value))
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_claims() -> TokenClaims {
        let value = json!({
            "iss": "test-issuer",
            "username": "alice",
            "email": "alice@example.com",
            "iat": 1_700_000_000,
            "exp": 1_700_000_005,
        });
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_accessors() {
        let claims = sample_claims();

        assert_eq!(claims.iss(), Some("test-issuer"));
        assert_eq!(claims.iat(), Some(1_700_000_000));
        assert_eq!(claims.exp(), Some(1_700_000_005));
        assert_eq!(claims.username(), Some("alice"));
        assert_eq!(claims.email(), Some("alice@example.com"));
        assert!(claims.get("missing").is_none());
    }

    #[test]
    fn test_debug_redacts_user_claims() {
        let debug_str = format!("{:?}", sample_claims());

        assert!(!debug_str.contains("alice"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("test-issuer"));
    }

    #[test]
    fn test_contains_subset() {
        let claims = sample_claims();
        let subset = json!({"iss": "test-issuer", "username": "alice"});
        let mismatch = json!({"username": "bob"});

        assert!(claims.contains_subset(subset.as_object().unwrap()));
        assert!(!claims.contains_subset(mismatch.as_object().unwrap()));
        assert!(claims.contains_subset(&Map::new()));
    }

    #[test]
    fn test_serializes_transparently() {
        let claims = sample_claims();
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["iss"], "test-issuer");
        assert_eq!(TokenClaims::from(json.as_object().unwrap().clone()), claims);
    }
}
