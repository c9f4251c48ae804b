//! JWT pre-parse utilities shared by the authentication crates.
//!
//! This module provides the pieces that run *before* any signature check:
//! - Size limit for DoS prevention
//! - Unverified payload decoding
//! - Claimed issuer (`iss`) extraction for issuer selection
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Nothing returned here is trusted: the claimed issuer is only used to pick
//!   which configured issuer to verify against, and the token MUST still be
//!   fully verified with that issuer's secret afterwards
//!
//! # Usage
//!
//! ```rust
//! use common::jwt::{extract_issuer, JwtValidationError};
//!
//! assert_eq!(extract_issuer("not-a-jwt"), Err(JwtValidationError::MalformedToken));
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{Map, Value};
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// JWTs larger than this size are rejected BEFORE any base64 decoding or
/// cryptographic operation. Typical HMAC-signed user tokens are well under
/// 1KB, so the limit leaves room for large domain claims.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while reading a JWT without verifying it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds maximum allowed.
    #[error("token exceeds the maximum allowed size")]
    TokenTooLarge,

    /// Token format is invalid (not a valid JWT structure).
    #[error("token is not a well-formed JWT")]
    MalformedToken,

    /// Token payload has no string `iss` claim.
    #[error("token has no issuer claim")]
    MissingIssuer,
}

// =============================================================================
// Functions
// =============================================================================

/// Decode the payload segment of a JWT without verifying the signature.
///
/// # Errors
///
/// - `TokenTooLarge` - Token exceeds `MAX_JWT_SIZE_BYTES`
/// - `MalformedToken` - Wrong number of segments, bad base64, or a payload
///   that is not a JSON object
pub fn decode_unverified_claims(token: &str) -> Result<Map<String, Value>, JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    // JWT format: header.payload.signature
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        tracing::debug!(
            target: "common.jwt",
            parts = parts.len(),
            "Token rejected: invalid JWT format"
        );
        return Err(JwtValidationError::MalformedToken);
    }

    let payload_part = parts.get(1).ok_or(JwtValidationError::MalformedToken)?;
    let payload_bytes = URL_SAFE_NO_PAD.decode(payload_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT payload base64");
        JwtValidationError::MalformedToken
    })?;

    let payload: Value = serde_json::from_slice(&payload_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT payload JSON");
        JwtValidationError::MalformedToken
    })?;

    match payload {
        Value::Object(claims) => Ok(claims),
        _ => {
            tracing::debug!(target: "common.jwt", "JWT payload is not a JSON object");
            Err(JwtValidationError::MalformedToken)
        }
    }
}

/// Extract the claimed issuer (`iss`) from a JWT without verifying it.
///
/// The returned value selects which configured issuer the token is verified
/// against. It must never be used as an authenticated identity on its own.
///
/// # Errors
///
/// Everything [`decode_unverified_claims`] returns, plus `MissingIssuer` when
/// `iss` is absent, empty, or not a string.
pub fn extract_issuer(token: &str) -> Result<String, JwtValidationError> {
    let claims = decode_unverified_claims(token)?;

    claims
        .get("iss")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or(JwtValidationError::MissingIssuer)
}

// =============================================================================
// Tests
// =============================================================================
