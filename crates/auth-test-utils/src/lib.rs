//! # Auth Test Utilities
//!
//! Shared test utilities for the multi-issuer JWT resolver.
//!
//! This crate provides:
//! - Issuer fixtures (fixed names and secrets, ready-made registries)
//! - Test data builders (`TestTokenBuilder` for claims and signed tokens)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_test_utils::*;
//!
//! #[test]
//! fn test_example() {
//!     let registry = two_issuer_registry();
//!
//!     let token = TestTokenBuilder::new()
//!         .issued_by(SECOND_ISSUER)
//!         .sign(SECOND_SECRET);
//!
//!     let claims = jwt_auth::resolve(&token, &registry, false).unwrap();
//!     assert_eq!(claims.iss(), Some(SECOND_ISSUER));
//! }
//! ```

pub mod fixtures;
pub mod token_builders;

// Re-export commonly used items
pub use fixtures::*;
pub use token_builders::*;
