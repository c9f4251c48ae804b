//! Deterministic issuer fixtures
//!
//! Fixed issuer names and secrets shared by the resolver tests. The ordering
//! of the registries matters: the first entry is always the fast path.

use common::secret::SecretString;
use jwt_auth::{IssuerConfig, IssuerRegistry};

/// Fast-path issuer (first registry entry)
pub const FAST_PATH_ISSUER: &str = "test-issuer";
pub const FAST_PATH_SECRET: &str = "test-secret-key";

/// Issuer that shares a secret with [`SECOND_ISSUER`] but never signs tokens
pub const DECOY_ISSUER: &str = "test-invalid-issuer";
pub const DECOY_SECRET: &str = "test-secret-key-2";

pub const SECOND_ISSUER: &str = "test-issuer-2";
pub const SECOND_SECRET: &str = "test-secret-key-2";

/// Audience shared by every fixture issuer
pub const TEST_AUDIENCE: &str = "test-audience";

/// Issuer name that is never configured
pub const UNKNOWN_ISSUER: &str = "test-unknown-issuer";

/// Build an HS256 issuer with the fixture audience
pub fn test_issuer(name: &str, secret: &str) -> IssuerConfig {
    IssuerConfig::new(name, TEST_AUDIENCE, SecretString::from(secret))
}

/// Registry with only the fast-path issuer
pub fn single_issuer_registry() -> IssuerRegistry {
    IssuerRegistry::new(vec![test_issuer(FAST_PATH_ISSUER, FAST_PATH_SECRET)])
}

/// Fast-path issuer followed by [`SECOND_ISSUER`]
pub fn two_issuer_registry() -> IssuerRegistry {
    IssuerRegistry::new(vec![
        test_issuer(FAST_PATH_ISSUER, FAST_PATH_SECRET),
        test_issuer(SECOND_ISSUER, SECOND_SECRET),
    ])
}

/// Fast-path, decoy, then [`SECOND_ISSUER`]
pub fn three_issuer_registry() -> IssuerRegistry {
    IssuerRegistry::new(vec![
        test_issuer(FAST_PATH_ISSUER, FAST_PATH_SECRET),
        test_issuer(DECOY_ISSUER, DECOY_SECRET),
        test_issuer(SECOND_ISSUER, SECOND_SECRET),
    ])
}

/// Same secrets as [`three_issuer_registry`] but `SECOND_ISSUER` is given a
/// secret that did not sign any fixture token
pub fn rotated_second_issuer_registry() -> IssuerRegistry {
    IssuerRegistry::new(vec![
        test_issuer(FAST_PATH_ISSUER, FAST_PATH_SECRET),
        test_issuer(DECOY_ISSUER, DECOY_SECRET),
        test_issuer(SECOND_ISSUER, "test-secret-key-rotated"),
    ])
}
