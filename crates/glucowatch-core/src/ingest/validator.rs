//! Telemetry payload validation

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ValidationError;
use crate::models::Reading;

/// Parse and check a raw inbound payload, producing a well-formed [`Reading`].
///
/// `device_id` and `glucose_level` are required; `glucose_level` may arrive
/// as a JSON number or a numeric string. An absent `timestamp` is assigned
/// the current UTC instant here, as part of validation. No range checks
/// beyond numeric coercion: out-of-range levels are the alerter's business.
pub fn validate(raw: &Value) -> Result<Reading, ValidationError> {
    let device_id = parse_device_id(raw)?;
    let glucose_mg_dl = parse_glucose_level(raw)?;
    let recorded_at = parse_timestamp(raw)?;

    Ok(Reading {
        device_id,
        recorded_at,
        glucose_mg_dl,
    })
}

fn parse_device_id(raw: &Value) -> Result<String, ValidationError> {
    match raw.get("device_id") {
        None | Some(Value::Null) => Err(ValidationError::MissingField { field: "device_id" }),
        Some(Value::String(s)) if s.is_empty() => {
            Err(ValidationError::MissingField { field: "device_id" })
        }
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::InvalidType { field: "device_id" }),
    }
}

fn parse_glucose_level(raw: &Value) -> Result<f64, ValidationError> {
    let value = match raw.get("glucose_level") {
        None | Some(Value::Null) => {
            return Err(ValidationError::MissingField {
                field: "glucose_level",
            })
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match value {
        Some(level) if level.is_finite() => Ok(level),
        _ => Err(ValidationError::InvalidType {
            field: "glucose_level",
        }),
    }
}

fn parse_timestamp(raw: &Value) -> Result<DateTime<Utc>, ValidationError> {
    match raw.get("timestamp") {
        // Server-assigned processing instant when the caller omits it
        None | Some(Value::Null) => Ok(Utc::now()),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| ValidationError::InvalidType { field: "timestamp" }),
        Some(_) => Err(ValidationError::InvalidType { field: "timestamp" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn accepts_a_complete_payload() {
        let reading = validate(&json!({
            "device_id": "dev-1",
            "timestamp": "2025-06-01T08:30:00Z",
            "glucose_level": 142.5,
        }))
        .expect("valid payload");

        assert_eq!(reading.device_id, "dev-1");
        assert_eq!(reading.glucose_mg_dl, 142.5);
        assert_eq!(reading.recorded_at.to_rfc3339(), "2025-06-01T08:30:00+00:00");
    }

    #[test]
    fn missing_device_id_is_rejected() {
        let err = validate(&json!({ "glucose_level": 90 })).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "device_id" });
        assert_eq!(err.to_string(), "missing field: device_id");
    }

    #[test]
    fn empty_device_id_counts_as_missing() {
        let err = validate(&json!({ "device_id": "", "glucose_level": 90 })).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "device_id" });
    }

    #[test]
    fn missing_glucose_level_is_rejected() {
        let err = validate(&json!({ "device_id": "dev-1" })).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "glucose_level"
            }
        );
    }

    #[test]
    fn numeric_string_glucose_level_coerces() {
        let reading = validate(&json!({
            "device_id": "dev-1",
            "glucose_level": "118.4",
        }))
        .expect("numeric string coerces");

        assert_eq!(reading.glucose_mg_dl, 118.4);
    }

    #[test]
    fn non_numeric_glucose_level_is_an_invalid_type() {
        let err = validate(&json!({
            "device_id": "dev-1",
            "glucose_level": "high",
        }))
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::InvalidType {
                field: "glucose_level"
            }
        );
    }

    #[test]
    fn absent_timestamp_gets_the_processing_instant() {
        let before = Utc::now();
        let reading = validate(&json!({
            "device_id": "dev-1",
            "glucose_level": 100,
        }))
        .expect("valid payload");
        let after = Utc::now();

        assert!(reading.recorded_at >= before && reading.recorded_at <= after);
    }

    #[test]
    fn caller_timestamp_is_authoritative() {
        // Out-of-order device clocks are accepted as-is, no skew correction
        let reading = validate(&json!({
            "device_id": "dev-1",
            "timestamp": "2001-01-01T00:00:00Z",
            "glucose_level": 100,
        }))
        .expect("valid payload");

        assert_eq!(reading.recorded_at.to_rfc3339(), "2001-01-01T00:00:00+00:00");
    }

    #[test]
    fn unparseable_timestamp_is_an_invalid_type() {
        let err = validate(&json!({
            "device_id": "dev-1",
            "timestamp": "yesterday",
            "glucose_level": 100,
        }))
        .unwrap_err();

        assert_eq!(err, ValidationError::InvalidType { field: "timestamp" });
    }

    #[test]
    fn non_finite_glucose_level_is_rejected() {
        let err = validate(&json!({
            "device_id": "dev-1",
            "glucose_level": "NaN",
        }))
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::InvalidType {
                field: "glucose_level"
            }
        );
    }
}
