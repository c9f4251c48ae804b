//! Course view to commerce API payload.
//!
//! Prices are truncated toward zero, never rounded: 19.997 publishes as 19.
//! Timestamps are RFC 3339 with an explicit `+00:00` offset.

use crate::course::{mode_for_seat, CourseView, SeatView};
use crate::errors::PublishError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Body of `PUT /courses/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishRequest {
    pub id: String,
    pub name: String,
    pub verification_deadline: Option<String>,
    pub modes: Vec<ModeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeDescriptor {
    pub name: String,
    pub currency: String,
    pub price: i64,
    pub sku: String,
    pub expires: Option<String>,
}

/// Build the publish payload for `course`, preserving seat order.
///
/// # Errors
///
/// Returns `PublishError::Serialization` when a seat price is not finite or
/// does not fit in an `i64`.
pub fn serialize_course(course: &CourseView) -> Result<PublishRequest, PublishError> {
    let modes = course
        .seats
        .iter()
        .map(serialize_seat)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PublishRequest {
        id: course.id.clone(),
        name: course.name.clone(),
        verification_deadline: course.verification_deadline.as_ref().map(format_timestamp),
        modes,
    })
}

fn serialize_seat(seat: &SeatView) -> Result<ModeDescriptor, PublishError> {
    let expires = if seat.is_professional() {
        None
    } else {
        seat.expires.as_ref().map(format_timestamp)
    };

    Ok(ModeDescriptor {
        name: mode_for_seat(seat),
        currency: seat.currency.clone(),
        price: truncate_price(seat.price_excl_tax, &seat.sku)?,
        sku: seat.sku.clone(),
        expires,
    })
}

// Bounds are exclusive of 2^63 so the cast below cannot saturate
const PRICE_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Truncate a price toward zero to whole currency units.
///
/// Prices are `f64`. Truncation is exact for two-decimal prices with whole
/// parts below 2^46 (about 7e13), where the nearest double to `x.99` is
/// still below `x + 1`. Inputs with more than ~15 significant digits are
/// rounded when parsed, before truncation: `9.9999999999999999` arrives as
/// `10.0` and publishes as 10.
#[allow(clippy::cast_possible_truncation)]
fn truncate_price(price: f64, sku: &str) -> Result<i64, PublishError> {
    let truncated = price.trunc();
    if !truncated.is_finite() || truncated >= PRICE_UPPER_BOUND || truncated < -PRICE_UPPER_BOUND {
        return Err(PublishError::Serialization(format!(
            "seat {sku} has unrepresentable price {price}"
        )));
    }
    Ok(truncated as i64)
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
    }

    fn seat(certificate_type: &str, price: f64) -> SeatView {
        SeatView {
            certificate_type: Some(certificate_type.to_string()),
            id_verification_required: true,
            price_excl_tax: price,
            currency: "USD".to_string(),
            sku: format!("SKU-{certificate_type}"),
            expires: Some(expiry()),
        }
    }

    fn course(seats: Vec<SeatView>) -> CourseView {
        CourseView {
            id: "course-v1:edX+DemoX+Demo_Course".to_string(),
            name: "Demo Course".to_string(),
            verification_deadline: None,
            seats,
        }
    }

    #[test]
    fn test_price_truncated_not_rounded() {
        let request = serialize_course(&course(vec![seat("verified", 19.997)])).unwrap();
        assert_eq!(request.modes[0].price, 19);

        let request = serialize_course(&course(vec![seat("verified", 0.99)])).unwrap();
        assert_eq!(request.modes[0].price, 0);
    }

    #[test]
    fn test_two_decimal_prices_truncate_exactly() {
        for whole in [0_i64, 1, 19, 999, 1_234_567, 99_999_999_999] {
            for cents in [0, 1, 50, 99] {
                let price: f64 = format!("{whole}.{cents:02}").parse().unwrap();
                assert_eq!(truncate_price(price, "SKU").unwrap(), whole, "{whole}.{cents:02}");
            }
        }
    }

    #[test]
    fn test_excess_precision_rounds_at_parse() {
        let price: f64 = "9.9999999999999999".parse().unwrap();
        assert_eq!(truncate_price(price, "SKU").unwrap(), 10);
    }

    #[test]
    fn test_non_finite_price_is_serialization_error() {
        for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300] {
            let result = serialize_course(&course(vec![seat("verified", price)]));
            assert!(
                matches!(result, Err(PublishError::Serialization(_))),
                "price {price} should fail"
            );
        }
    }

    #[test]
    fn test_professional_seat_never_expires() {
        let mut no_id = seat("professional", 100.0);
        no_id.id_verification_required = false;

        let request =
            serialize_course(&course(vec![seat("professional", 100.0), no_id])).unwrap();

        assert_eq!(request.modes[0].name, "professional");
        assert_eq!(request.modes[0].expires, None);
        assert_eq!(request.modes[1].name, "no-id-professional");
        assert_eq!(request.modes[1].expires, None);
    }

    #[test]
    fn test_expiration_serialized_for_other_seats() {
        let mut audit = seat("verified", 0.0);
        audit.certificate_type = None;
        audit.expires = None;

        let request = serialize_course(&course(vec![seat("verified", 49.0), audit])).unwrap();

        assert_eq!(
            request.modes[0].expires.as_deref(),
            Some("2030-06-01T12:00:00+00:00")
        );
        assert_eq!(request.modes[1].name, "audit");
        assert_eq!(request.modes[1].expires, None);
    }

    #[test]
    fn test_request_json_shape() {
        let mut demo = course(vec![seat("verified", 49.5)]);
        demo.verification_deadline = Some(expiry());

        let json = serde_json::to_value(serialize_course(&demo).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "course-v1:edX+DemoX+Demo_Course",
                "name": "Demo Course",
                "verification_deadline": "2030-06-01T12:00:00+00:00",
                "modes": [{
                    "name": "verified",
                    "currency": "USD",
                    "price": 49,
                    "sku": "SKU-verified",
                    "expires": "2030-06-01T12:00:00+00:00",
                }],
            })
        );
    }

    #[test]
    fn test_null_fields_are_serialized() {
        let json = serde_json::to_value(serialize_course(&course(Vec::new())).unwrap()).unwrap();

        assert!(json["verification_deadline"].is_null());
        assert_eq!(json["modes"], serde_json::json!([]));
    }
}
