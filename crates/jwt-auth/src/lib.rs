//! Multi-issuer JWT authentication.
//!
//! A single deployment accepts tokens minted by several identity providers.
//! Which HMAC secret signed a token cannot be known up front, so resolution is
//! done by trial validation with a fixed, auditable order:
//!
//! 1. **Fast path** - validate against the first configured issuer only.
//! 2. **Fallback** - read the claimed `iss` without verification, pick the
//!    configured issuer with that name, and validate fully against it.
//!
//! When both attempts fail, the caller gets one consolidated error naming each
//! attempted issuer and why it rejected the token.
//!
//! # Modules
//!
//! - `issuer` - Issuer configuration, the ordered registry, validation settings
//! - `claims` - Decoded claim set
//! - `validator` - Single-issuer validation with typed failure reasons
//! - `resolver` - Two-phase multi-issuer resolution
//! - `observability` - Decode-handler tags and the failure logging policy
//! - `config` - Loading the above from environment variables
//!
//! # Example
//!
//! ```rust,ignore
//! use jwt_auth::{IssuerConfig, IssuerRegistry, MultiIssuerResolver, ValidationSettings};
//!
//! let registry = IssuerRegistry::new(vec![
//!     IssuerConfig::new("lms", "lms-audience", "lms-secret".into()),
//!     IssuerConfig::new("ecommerce", "ecommerce-audience", "ecommerce-secret".into()),
//! ]);
//!
//! let resolver = MultiIssuerResolver::default();
//! let claims = resolver.resolve(token, &registry, &ValidationSettings::new(false))?;
//! ```

pub mod claims;
pub mod config;
pub mod issuer;
pub mod observability;
pub mod resolver;
pub mod validator;

pub use claims::TokenClaims;
pub use config::{AuthConfig, ConfigError};
pub use issuer::{IssuerConfig, IssuerRegistry, ValidationSettings};
pub use observability::{
    DecodeHandler, FailureLogPolicy, MetricsObserver, NoopObserver, QuietPolicy,
    ResolutionObserver, SwitchSet,
};
pub use resolver::{resolve, MultiIssuerResolver, ResolveError};
pub use validator::{validate, FailureReason, ValidationOutcome};
