//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Issuer signing
//! secrets and the commerce API key are held in these types so that any
//! struct deriving `Debug` around them prints a redacted placeholder.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct Issuer {
//!     name: String,
//!     signing_secret: SecretString,
//! }
//!
//! let issuer = Issuer {
//!     name: "lms".to_string(),
//!     signing_secret: SecretString::from("lms-secret"),
//! };
//!
//! // Redacted in Debug output
//! assert!(!format!("{issuer:?}").contains("lms-secret"));
//!
//! // Access requires an explicit call
//! assert_eq!(issuer.signing_secret.expose_secret(), "lms-secret");
//! ```
//!
//! Use `SecretString` for:
//! - JWT signing secrets (HMAC keys)
//! - API keys sent to downstream services
//! - Bearer tokens
//!
//! With the `serde` feature of `secrecy` enabled, secrets deserialize straight
//! from configuration JSON.

pub use secrecy::{ExposeSecret, SecretString};
