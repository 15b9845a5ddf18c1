//! Vendor API response handling.
//!
//! The API answers `{"vendors": [ ... ]}`. The envelope is validated as a
//! whole, then each record is parsed on its own so that one bad entry does
//! not discard the rest of the batch.

use zoodro_core::VendorRecord;

use crate::error::ClientError;

/// The usable vendors from one response, plus how many records were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorBatch {
    pub vendors: Vec<VendorRecord>,
    pub skipped: usize,
}

impl VendorBatch {
    #[must_use]
    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

/// Extracts the vendor list from a decoded response body.
///
/// # Errors
///
/// Returns [`ClientError::MalformedEnvelope`] if `vendors` is absent or is
/// not an array. Individual records that fail to deserialize, or whose
/// coordinates are out of range, are skipped rather than treated as errors.
pub(crate) fn parse_vendor_envelope(
    mut body: serde_json::Value,
    url: &str,
) -> Result<VendorBatch, ClientError> {
    let raw = match body.get_mut("vendors").map(serde_json::Value::take) {
        Some(serde_json::Value::Array(items)) => items,
        Some(other) => {
            return Err(ClientError::MalformedEnvelope {
                url: url.to_owned(),
                reason: format!("`vendors` is {}, expected an array", json_kind(&other)),
            })
        }
        None => {
            return Err(ClientError::MalformedEnvelope {
                url: url.to_owned(),
                reason: "`vendors` field is missing".to_owned(),
            })
        }
    };

    let total = raw.len();
    let vendors: Vec<VendorRecord> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            match serde_json::from_value::<VendorRecord>(value) {
                Ok(record) if record.has_valid_location() => Some(record),
                Ok(record) => {
                    tracing::warn!(
                        index,
                        lat = record.lat,
                        lng = record.lng,
                        "skipping vendor with out-of-range coordinates"
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed vendor record");
                    None
                }
            }
        })
        .collect();

    let skipped = total - vendors.len();
    Ok(VendorBatch { vendors, skipped })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const URL: &str = "http://test/vendors";

    #[test]
    fn keeps_well_formed_records() {
        let body = json!({"vendors": [
            {"lat": 35.7, "lng": 51.4, "name": "a", "off": 10},
            {"lat": 35.71, "lng": 51.41, "name": "b", "off": 25, "max": 500_000}
        ]});
        let batch = parse_vendor_envelope(body, URL).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.vendors[1].max, Some(500_000.0));
    }

    #[test]
    fn filters_record_with_non_numeric_lat() {
        let body = json!({"vendors": [
            {"lat": 1, "lng": 2, "name": "x", "off": 10},
            {"lat": "bad"}
        ]});
        let batch = parse_vendor_envelope(body, URL).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.vendors[0].name, "x");
    }

    #[test]
    fn keeps_records_whose_optional_fields_are_odd() {
        let body = json!({"vendors": [
            {"lat": 35.7, "lng": 51.4, "name": "float max", "off": 10, "max": 1500.0},
            {"lat": 35.7, "lng": 51.4, "name": null, "off": 10},
            {"lat": 35.7, "lng": 51.4, "name": "null off", "off": null},
            {"lat": 35.7, "lng": 51.4, "name": "clean", "off": 10}
        ]});
        let batch = parse_vendor_envelope(body, URL).unwrap();
        assert_eq!(batch.len(), 4);
        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.vendors[0].max, Some(1500.0));
        assert_eq!(batch.vendors[1].name, "");
        assert!(batch.vendors[2].off.abs() < f64::EPSILON);
    }

    #[test]
    fn filters_record_with_out_of_range_coordinates() {
        let body = json!({"vendors": [
            {"lat": 95.0, "lng": 2, "name": "north of north"},
            {"lat": 1, "lng": 2, "name": "ok"}
        ]});
        let batch = parse_vendor_envelope(body, URL).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.vendors[0].name, "ok");
    }

    #[test]
    fn empty_array_is_an_empty_batch() {
        let batch = parse_vendor_envelope(json!({"vendors": []}), URL).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.skipped, 0);
    }

    #[test]
    fn missing_vendors_is_malformed() {
        let err = parse_vendor_envelope(json!({"error": "nope"}), URL).unwrap_err();
        assert!(
            matches!(err, ClientError::MalformedEnvelope { ref reason, .. } if reason.contains("missing")),
            "got {err:?}"
        );
    }

    #[test]
    fn non_array_vendors_is_malformed() {
        for body in [json!({"vendors": null}), json!({"vendors": {"lat": 1}})] {
            let err = parse_vendor_envelope(body, URL).unwrap_err();
            assert!(matches!(err, ClientError::MalformedEnvelope { .. }), "got {err:?}");
        }
    }

    #[test]
    fn non_object_body_is_malformed() {
        let err = parse_vendor_envelope(json!([1, 2, 3]), URL).unwrap_err();
        assert!(matches!(err, ClientError::MalformedEnvelope { .. }));
    }
}
