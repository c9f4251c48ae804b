//! Read-only views of a course and its purchasable seats.
//!
//! These are the only facts the publisher needs; where they are loaded from
//! is the caller's concern.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Mode name used for seats without a certificate type.
pub const AUDIT_MODE: &str = "audit";

/// Professional seats that skip ID verification publish under this mode.
pub const NO_ID_PROFESSIONAL_MODE: &str = "no-id-professional";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CourseView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub verification_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seats: Vec<SeatView>,
}

/// A purchasable enrollment option.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeatView {
    #[serde(default)]
    pub certificate_type: Option<String>,
    #[serde(default)]
    pub id_verification_required: bool,
    /// Tax-exclusive price in major currency units. Held as `f64`; see
    /// `serializer::truncate_price` for the precision this allows.
    pub price_excl_tax: f64,
    pub currency: String,
    pub sku: String,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

impl SeatView {
    /// Professional-certificate seats never publish an expiration.
    #[must_use]
    pub fn is_professional(&self) -> bool {
        self.certificate_type
            .as_deref()
            .is_some_and(|t| t.contains("professional"))
    }
}

/// Enrollment mode name the commerce API knows this seat by.
#[must_use]
pub fn mode_for_seat(seat: &SeatView) -> String {
    match seat.certificate_type.as_deref() {
        None | Some("") => AUDIT_MODE.to_string(),
        Some("professional") if !seat.id_verification_required => {
            NO_ID_PROFESSIONAL_MODE.to_string()
        }
        Some(certificate_type) => certificate_type.to_string(),
    }
}
