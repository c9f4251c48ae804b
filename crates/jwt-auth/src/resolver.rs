//! Two-phase multi-issuer resolution.
//!
//! # Algorithm
//!
//! 1. **Fast path** - validate against the first issuer only, whatever the
//!    token claims. Success ends resolution with the `edx-drf-extensions` tag.
//!    With a single configured issuer a failure ends resolution too.
//! 2. **Fallback** - read `iss` without verification, select the first issuer
//!    with that name, and validate fully against it (even when it is the
//!    fast-path issuer). Success is tagged `ecommerce-multiple-issuers`.
//!
//! A failed fast path followed by a successful fallback is normal operation
//! and is never logged above info level. When the fallback fails too, both
//! reasons are reported together, fast path first.

use crate::claims::TokenClaims;
use crate::issuer::{IssuerRegistry, ValidationSettings};
use crate::observability::{
    DecodeHandler, FailureLogPolicy, NoopObserver, QuietPolicy, ResolutionObserver,
};
use crate::validator::{validate, FailureReason, ValidationOutcome};
use common::jwt::extract_issuer;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

/// Resolution failure surfaced to the caller.
///
/// Every variant denies access. `NoIssuersConfigured` is a deployment problem
/// rather than a bad token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The registry is empty.
    #[error("No JWT issuers are configured")]
    NoIssuersConfigured,

    /// The only configured issuer rejected the token.
    #[error("JWT issuer rejected the token. {0}.")]
    Rejected(FailureReason),

    /// The token could not be decoded, even without verification.
    #[error("JWT could not be decoded. Malformed token.")]
    MalformedToken,

    /// The claimed issuer is not in the registry.
    #[error("JWT issuer is not configured. No configured issuer matches token issuer {0}.")]
    IssuerNotConfigured(String),

    /// Both the fast-path and the fallback issuer rejected the token.
    #[error(
        "All combinations of JWT issuers with updated config failed to validate the token. {fast_path}. {fallback}."
    )]
    AllIssuersFailed {
        fast_path: FailureReason,
        fallback: FailureReason,
    },
}

impl ResolveError {
    /// True when the failure stems from configuration rather than the token.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::NoIssuersConfigured)
    }
}

/// Resolves tokens across an ordered issuer registry.
///
/// Holds only injected capabilities. The registry and settings are passed to
/// every call, so one resolver can serve any number of configuration
/// snapshots concurrently.
#[derive(Clone)]
pub struct MultiIssuerResolver {
    observer: Arc<dyn ResolutionObserver>,
    log_policy: Arc<dyn FailureLogPolicy>,
}

impl fmt::Debug for MultiIssuerResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiIssuerResolver").finish_non_exhaustive()
    }
}

impl Default for MultiIssuerResolver {
    fn default() -> Self {
        Self::new(Arc::new(NoopObserver), Arc::new(QuietPolicy))
    }
}

impl MultiIssuerResolver {
    #[must_use]
    pub fn new(
        observer: Arc<dyn ResolutionObserver>,
        log_policy: Arc<dyn FailureLogPolicy>,
    ) -> Self {
        Self {
            observer,
            log_policy,
        }
    }

    /// Resolve `token` to its claims.
    ///
    /// # Errors
    ///
    /// - `NoIssuersConfigured` - the registry is empty
    /// - `Rejected` - single issuer configured and it rejected the token
    /// - `MalformedToken` - fallback could not read the claimed issuer
    /// - `IssuerNotConfigured` - fallback found no issuer with the claimed name
    /// - `AllIssuersFailed` - fast path and fallback both rejected the token
    #[instrument(skip_all, fields(issuers = registry.len()))]
    pub fn resolve(
        &self,
        token: &str,
        registry: &IssuerRegistry,
        settings: &ValidationSettings,
    ) -> Result<TokenClaims, ResolveError> {
        let Some(fast_path) = registry.fast_path() else {
            error!(target: "jwt_auth.resolver", "No JWT issuers configured; rejecting token");
            return Err(ResolveError::NoIssuersConfigured);
        };

        let fast_path_failure = match validate(token, fast_path, settings) {
            ValidationOutcome::Success(claims) => {
                debug!(
                    target: "jwt_auth.resolver",
                    issuer = %fast_path.issuer_name,
                    handler = %DecodeHandler::EdxDrfExtensions,
                    "Token resolved on fast path"
                );
                self.observer
                    .record_decode_handler(DecodeHandler::EdxDrfExtensions);
                return Ok(claims);
            }
            ValidationOutcome::Failure(reason) => reason,
        };

        if registry.len() == 1 {
            let err = ResolveError::Rejected(fast_path_failure);
            self.log_failure(DecodeHandler::EdxDrfExtensions, &err);
            return Err(err);
        }

        self.log_fast_path_bypass(&fast_path_failure);

        match self.resolve_fallback(token, registry, settings, fast_path_failure) {
            Ok(claims) => {
                self.observer
                    .record_decode_handler(DecodeHandler::MultipleIssuers);
                Ok(claims)
            }
            Err(err) => {
                self.log_failure(DecodeHandler::MultipleIssuers, &err);
                Err(err)
            }
        }
    }

    fn resolve_fallback(
        &self,
        token: &str,
        registry: &IssuerRegistry,
        settings: &ValidationSettings,
        fast_path_failure: FailureReason,
    ) -> Result<TokenClaims, ResolveError> {
        let claimed_issuer = extract_issuer(token).map_err(|e| {
            debug!(target: "jwt_auth.resolver", error = %e, "Unable to read claimed issuer");
            ResolveError::MalformedToken
        })?;

        let Some(issuer) = registry.find_by_name(&claimed_issuer) else {
            return Err(ResolveError::IssuerNotConfigured(claimed_issuer));
        };

        match validate(token, issuer, settings) {
            ValidationOutcome::Success(claims) => {
                info!(
                    target: "jwt_auth.resolver",
                    issuer = %issuer.issuer_name,
                    handler = %DecodeHandler::MultipleIssuers,
                    "Token resolved using multiple issuer fallback"
                );
                Ok(claims)
            }
            ValidationOutcome::Failure(fallback) => Err(ResolveError::AllIssuersFailed {
                fast_path: fast_path_failure,
                fallback,
            }),
        }
    }

    /// The fast path failing is expected whenever a non-first issuer signed
    /// the token; it is never logged above info.
    fn log_fast_path_bypass(&self, reason: &FailureReason) {
        if self
            .log_policy
            .log_exceptions(DecodeHandler::EdxDrfExtensions)
        {
            info!(
                target: "jwt_auth.resolver",
                reason = %reason,
                "Failed to use edx-drf-extensions jwt_decode_handler."
            );
        } else {
            debug!(
                target: "jwt_auth.resolver",
                reason = %reason,
                "Fast path issuer rejected token; trying claimed issuer"
            );
        }
    }

    fn log_failure(&self, handler: DecodeHandler, err: &ResolveError) {
        if self.log_policy.log_exceptions(handler) {
            error!(
                target: "jwt_auth.resolver",
                handler = %handler,
                error = %err,
                "Custom config JWT decode failed!"
            );
        } else {
            info!(
                target: "jwt_auth.resolver",
                handler = %handler,
                error = %err,
                "JWT decode failed"
            );
        }
    }
}

/// Resolve with default settings, no observer, and quiet failure logging.
///
/// # Errors
///
/// See [`MultiIssuerResolver::resolve`].
pub fn resolve(
    token: &str,
    registry: &IssuerRegistry,
    verify_audience: bool,
) -> Result<TokenClaims, ResolveError> {
    MultiIssuerResolver::default().resolve(
        token,
        registry,
        &ValidationSettings::new(verify_audience),
    )
}
