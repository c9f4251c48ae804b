//! Single-issuer token validation.
//!
//! Validates one token against one issuer and reports a typed failure reason.
//! The resolver composes these outcomes; nothing here decides whether another
//! issuer should be tried.
//!
//! # Checks
//!
//! 1. Size check - reject tokens > 8KB before parsing
//! 2. HMAC signature with the issuer's secret and algorithm
//! 3. Required claims (`iss`, `exp`, and `iat`; `aud` when verifying audience)
//! 4. `exp` against the current time with leeway
//! 5. `iss` equals the issuer name
//! 6. `aud` equals the issuer audience (when enabled)

use crate::claims::TokenClaims;
use crate::issuer::{IssuerConfig, ValidationSettings};
use common::jwt::MAX_JWT_SIZE_BYTES;
use common::secret::ExposeSecret;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde_json::Value;
use thiserror::Error;

/// Why an issuer rejected a token.
///
/// The `Display` text is the human-readable description used in the
/// consolidated resolver error, so it must stay stable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Signature did not verify with the issuer's secret, or the audience did
    /// not match.
    #[error("Wrong secret_key for issuer {0}")]
    SignatureMismatch(String),

    /// Token verified but `exp` is in the past.
    #[error("Invalid token found using issuer {0} (token has expired)")]
    Expired(String),

    /// Token could not be decoded at all.
    #[error("Malformed token")]
    MalformedToken,

    /// The claimed `iss` names no configured issuer.
    #[error("No configured issuer matches token issuer {0}")]
    IssuerNotConfigured(String),

    /// Token verified but its `iss` names a different issuer.
    #[error("Issuer {0} does not match token issuer")]
    IssuerMismatch(String),

    /// Token header algorithm is not the one configured for the issuer.
    #[error("Algorithm not allowed for issuer {0}")]
    AlgorithmMismatch(String),

    /// Token verified but a required claim is missing or invalid.
    #[error("Invalid token found using issuer {0}")]
    InvalidClaims(String),
}

/// Result of validating a token against one issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Success(TokenClaims),
    Failure(FailureReason),
}

impl ValidationOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Convert into a `Result` for `?`-style callers.
    ///
    /// # Errors
    ///
    /// Returns the failure reason when validation failed.
    pub fn into_result(self) -> Result<TokenClaims, FailureReason> {
        match self {
            Self::Success(claims) => Ok(claims),
            Self::Failure(reason) => Err(reason),
        }
    }
}

/// Validate `token` against a single issuer.
///
/// Never panics and has no side effects beyond debug-level tracing.
#[must_use]
pub fn validate(
    token: &str,
    issuer: &IssuerConfig,
    settings: &ValidationSettings,
) -> ValidationOutcome {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "jwt_auth.validator",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return ValidationOutcome::Failure(FailureReason::MalformedToken);
    }

    let decoding_key = DecodingKey::from_secret(issuer.signing_secret.expose_secret().as_bytes());
    let validation = build_validation(issuer, settings);

    let claims = match decode::<TokenClaims>(token, &decoding_key, &validation) {
        Ok(token_data) => token_data.claims,
        Err(e) => {
            let reason = classify_error(&e, &issuer.issuer_name);
            tracing::debug!(
                target: "jwt_auth.validator",
                issuer = %issuer.issuer_name,
                error = %e,
                reason = %reason,
                "Token rejected by issuer"
            );
            return ValidationOutcome::Failure(reason);
        }
    };

    // jsonwebtoken has no required-claim check for iat; any JSON number counts
    if !claims.get("iat").is_some_and(Value::is_number) {
        tracing::debug!(
            target: "jwt_auth.validator",
            issuer = %issuer.issuer_name,
            "Token rejected: missing or non-numeric iat"
        );
        return ValidationOutcome::Failure(FailureReason::InvalidClaims(
            issuer.issuer_name.clone(),
        ));
    }

    tracing::debug!(
        target: "jwt_auth.validator",
        issuer = %issuer.issuer_name,
        "Token validated successfully"
    );
    ValidationOutcome::Success(claims)
}

fn build_validation(issuer: &IssuerConfig, settings: &ValidationSettings) -> Validation {
    let mut validation = Validation::new(issuer.algorithm);
    validation.leeway = settings.leeway.as_secs();
    validation.validate_exp = settings.verify_expiration;
    validation.set_issuer(&[issuer.issuer_name.as_str()]);

    if settings.verify_audience {
        validation.set_audience(&[issuer.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
    } else {
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "iss"]);
    }

    validation
}

/// Map a `jsonwebtoken` error onto a failure reason for `issuer_name`.
fn classify_error(error: &JwtError, issuer_name: &str) -> FailureReason {
    let issuer = issuer_name.to_string();

    match error.kind() {
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            FailureReason::MalformedToken
        }
        ErrorKind::InvalidSignature | ErrorKind::InvalidAudience => {
            FailureReason::SignatureMismatch(issuer)
        }
        ErrorKind::MissingRequiredClaim(claim) if claim == "aud" => {
            FailureReason::SignatureMismatch(issuer)
        }
        ErrorKind::ExpiredSignature => FailureReason::Expired(issuer),
        ErrorKind::InvalidIssuer => FailureReason::IssuerMismatch(issuer),
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => FailureReason::AlgorithmMismatch(issuer),
        _ => FailureReason::InvalidClaims(issuer),
    }
}
