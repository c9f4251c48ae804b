//! Trusted issuer configuration.
//!
//! The registry is an immutable, ordered snapshot. Order matters: the first
//! entry is the fast-path issuer and the rest are only consulted by name.
//! Configuration reloads build a new registry instead of mutating this one.

use common::secret::SecretString;
use jsonwebtoken::Algorithm;
use std::slice;
use std::sync::Arc;
use std::time::Duration;

/// A single trusted token issuer.
///
/// `signing_secret` is redacted in Debug output.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Value the token's `iss` claim must carry.
    pub issuer_name: String,

    /// Expected `aud` value when audience verification is enabled.
    pub audience: String,

    /// HMAC secret shared with the issuer.
    pub signing_secret: SecretString,

    /// Signing algorithm. Only the HMAC family is accepted.
    pub algorithm: Algorithm,
}

impl IssuerConfig {
    /// Create an HS256 issuer.
    #[must_use]
    pub fn new(
        issuer_name: impl Into<String>,
        audience: impl Into<String>,
        signing_secret: SecretString,
    ) -> Self {
        Self {
            issuer_name: issuer_name.into(),
            audience: audience.into(),
            signing_secret,
            algorithm: Algorithm::HS256,
        }
    }

    /// Override the signing algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

/// Returns true for the algorithms an [`IssuerConfig`] may use.
#[must_use]
pub fn is_supported_algorithm(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

/// Ordered, read-only list of trusted issuers.
///
/// Cloning is cheap (the issuers are behind an `Arc`), so one snapshot can be
/// handed to every request without locking.
#[derive(Debug, Clone)]
pub struct IssuerRegistry {
    issuers: Arc<[IssuerConfig]>,
}

impl IssuerRegistry {
    /// Build a registry. The first issuer becomes the fast path.
    #[must_use]
    pub fn new(issuers: Vec<IssuerConfig>) -> Self {
        Self {
            issuers: issuers.into(),
        }
    }

    /// The issuer tried first for every token.
    #[must_use]
    pub fn fast_path(&self) -> Option<&IssuerConfig> {
        self.issuers.first()
    }

    /// First issuer whose name equals `issuer_name`.
    ///
    /// Duplicate names are not rejected; the earliest entry wins.
    #[must_use]
    pub fn find_by_name(&self, issuer_name: &str) -> Option<&IssuerConfig> {
        self.issuers
            .iter()
            .find(|issuer| issuer.issuer_name == issuer_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issuers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issuers.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, IssuerConfig> {
        self.issuers.iter()
    }
}

impl FromIterator<IssuerConfig> for IssuerRegistry {
    fn from_iter<I: IntoIterator<Item = IssuerConfig>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a IssuerRegistry {
    type Item = &'a IssuerConfig;
    type IntoIter = slice::Iter<'a, IssuerConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Checks applied to every issuer in a registry.
///
/// `verify_audience` is global rather than per issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSettings {
    /// Require `aud` to match the issuer's audience.
    pub verify_audience: bool,

    /// Reject tokens whose `exp` is in the past.
    pub verify_expiration: bool,

    /// Clock leeway applied to `exp`.
    pub leeway: Duration,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            verify_audience: true,
            verify_expiration: true,
            leeway: Duration::ZERO,
        }
    }
}

impl ValidationSettings {
    /// Default settings with the given audience toggle.
    #[must_use]
    pub fn new(verify_audience: bool) -> Self {
        Self {
            verify_audience,
            ..Self::default()
        }
    }

    /// Set the expiration check toggle.
    #[must_use]
    pub fn with_verify_expiration(mut self, verify_expiration: bool) -> Self {
        self.verify_expiration = verify_expiration;
        self
    }

    /// Set the clock leeway.
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn issuer(name: &str) -> IssuerConfig {
        IssuerConfig::new(name, "test-audience", SecretString::from("test-secret-key"))
    }

    #[test]
    fn test_issuer_debug_redacts_secret() {
        let config = IssuerConfig::new(
            "test-issuer",
            "test-audience",
            SecretString::from("super-secret-value"),
        );

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("test-issuer"));
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super-secret-value"));
    }

    #[test]
    fn test_issuer_defaults_to_hs256() {
        assert_eq!(issuer("a").algorithm, Algorithm::HS256);
        assert_eq!(
            issuer("a").with_algorithm(Algorithm::HS512).algorithm,
            Algorithm::HS512
        );
    }

    #[test]
    fn test_supported_algorithms_are_hmac_only() {
        assert!(is_supported_algorithm(Algorithm::HS256));
        assert!(is_supported_algorithm(Algorithm::HS384));
        assert!(is_supported_algorithm(Algorithm::HS512));
        assert!(!is_supported_algorithm(Algorithm::RS256));
        assert!(!is_supported_algorithm(Algorithm::EdDSA));
    }

    #[test]
    fn test_registry_fast_path_is_first_entry() {
        let registry = IssuerRegistry::new(vec![issuer("first"), issuer("second")]);

        assert_eq!(registry.fast_path().unwrap().issuer_name, "first");
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_empty_registry_has_no_fast_path() {
        let registry = IssuerRegistry::new(Vec::new());

        assert!(registry.fast_path().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_find_by_name_returns_first_duplicate() {
        let registry = IssuerRegistry::new(vec![
            issuer("first"),
            IssuerConfig::new("dup", "aud-1", SecretString::from("s1")),
            IssuerConfig::new("dup", "aud-2", SecretString::from("s2")),
        ]);

        let found = registry.find_by_name("dup").unwrap();
        assert_eq!(found.audience, "aud-1");
        assert!(registry.find_by_name("missing").is_none());
    }

    #[test]
    fn test_registry_preserves_order() {
        let registry: IssuerRegistry = ["a", "b", "c"].into_iter().map(issuer).collect();
        let names: Vec<&str> = registry.iter().map(|i| i.issuer_name.as_str()).collect();

        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_registry_clone_shares_snapshot() {
        let registry = IssuerRegistry::new(vec![issuer("a")]);
        let cloned = registry.clone();

        assert!(Arc::ptr_eq(&registry.issuers, &cloned.issuers));
    }

    #[test]
    fn test_validation_settings_defaults() {
        let settings = ValidationSettings::default();
        assert!(settings.verify_audience);
        assert!(settings.verify_expiration);
        assert_eq!(settings.leeway, Duration::ZERO);

        let settings = ValidationSettings::new(false)
            .with_verify_expiration(false)
            .with_leeway(Duration::from_secs(30));
        assert!(!settings.verify_audience);
        assert!(!settings.verify_expiration);
        assert_eq!(settings.leeway, Duration::from_secs(30));
    }
}
