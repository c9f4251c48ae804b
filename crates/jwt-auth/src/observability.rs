//! Resolution observability.
//!
//! Two capabilities are injected into the resolver:
//!
//! - [`ResolutionObserver`] receives one decode-handler tag per successful
//!   resolution, naming the phase that accepted the token.
//! - [`FailureLogPolicy`] decides whether a failed phase is worth an
//!   error-level log entry. In production this is driven by operator switches.
//!
//! # Metrics
//!
//! [`MetricsObserver`] records `ecom_jwt_decode_handler_total` with a
//! `handler` label. The label is bounded by [`DecodeHandler`] (2 values).

use metrics::counter;
use std::collections::HashSet;
use std::fmt;

/// Counter incremented once per successful resolution.
pub const DECODE_HANDLER_METRIC: &str = "ecom_jwt_decode_handler_total";

/// Prefix of the switch that escalates failures of a handler to error level.
pub const LOG_EXCEPTION_SWITCH_PREFIX: &str = "jwt_decode_handler.log_exception.";

/// Resolution phase that accepted (or last rejected) a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeHandler {
    /// Fast path: first configured issuer.
    EdxDrfExtensions,
    /// Fallback: issuer selected by the claimed `iss`.
    MultipleIssuers,
}

impl DecodeHandler {
    /// Tag value reported to observers and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EdxDrfExtensions => "edx-drf-extensions",
            Self::MultipleIssuers => "ecommerce-multiple-issuers",
        }
    }

    /// Name of the switch that escalates this handler's failures.
    #[must_use]
    pub fn log_exception_switch(self) -> String {
        format!("{LOG_EXCEPTION_SWITCH_PREFIX}{}", self.as_str())
    }
}

impl fmt::Display for DecodeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives the decode-handler tag of each successful resolution.
pub trait ResolutionObserver: Send + Sync {
    fn record_decode_handler(&self, handler: DecodeHandler);
}

/// Observer that discards every tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ResolutionObserver for NoopObserver {
    fn record_decode_handler(&self, _handler: DecodeHandler) {}
}

/// Observer backed by the `metrics` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObserver;

impl ResolutionObserver for MetricsObserver {
    fn record_decode_handler(&self, handler: DecodeHandler) {
        record_decode_handler(handler);
    }
}

/// Record a successful resolution by `handler`.
///
/// Metric: `ecom_jwt_decode_handler_total`
/// Labels: `handler`
pub fn record_decode_handler(handler: DecodeHandler) {
    counter!(DECODE_HANDLER_METRIC,
        "handler" => handler.as_str()
    )
    .increment(1);
}

/// Decides whether a handler's failures are logged at error level.
pub trait FailureLogPolicy: Send + Sync {
    fn log_exceptions(&self, handler: DecodeHandler) -> bool;
}

/// Policy that never escalates.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuietPolicy;

impl FailureLogPolicy for QuietPolicy {
    fn log_exceptions(&self, _handler: DecodeHandler) -> bool {
        false
    }
}

/// Snapshot of active operator switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchSet {
    active: HashSet<String>,
}

impl SwitchSet {
    pub fn new<I, S>(active: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active: active.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list of switch names. Blank entries are ignored.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty()),
        )
    }

    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl FailureLogPolicy for SwitchSet {
    fn log_exceptions(&self, handler: DecodeHandler) -> bool {
        self.is_active(&handler.log_exception_switch())
    }
}
