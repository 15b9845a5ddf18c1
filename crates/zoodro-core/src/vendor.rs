use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::GeoPoint;

/// Purchase amounts on the wire are in rial; offers are shown in toman.
const MINOR_UNITS_PER_MAJOR: f64 = 10.0;

/// A vendor with an active discount, as returned by the vendor API.
///
/// Field names follow the wire format: `lat`, `lng`, `name`, `off`
/// (discount percent) and the optional `min`/`max` purchase bounds in the
/// minor currency unit.
///
/// Only `lat` and `lng` are strict. The other fields fall back to their
/// defaults when absent, null or of the wrong type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, deserialize_with = "or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "or_default")]
    pub off: f64,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub min: Option<f64>,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub max: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Value(value) => value,
        Lenient::Other(_) => T::default(),
    })
}

impl VendorRecord {
    #[must_use]
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    #[must_use]
    pub fn has_valid_location(&self) -> bool {
        self.location().is_valid()
    }

    #[must_use]
    pub fn offer_limits(&self) -> OfferLimits {
        OfferLimits {
            min: self.min,
            max: self.max,
        }
    }
}

/// Minimum/maximum purchase bounds attached to an offer, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OfferLimits {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl OfferLimits {
    /// Human-readable description of the bounds in toman.
    ///
    /// Zero and non-finite amounts are treated the same as an absent bound.
    #[must_use]
    pub fn summary(&self) -> String {
        let min = self.min.filter(|v| v.is_normal()).map(to_major_units);
        let max = self.max.filter(|v| v.is_normal()).map(to_major_units);
        match (min, max) {
            (Some(min), Some(max)) => format!("min purchase {min} T - max {max} T"),
            (None, Some(max)) => format!("max {max} T"),
            (Some(min), None) => format!("min purchase {min} T"),
            (None, None) => "unlimited".to_owned(),
        }
    }
}

/// Rounded to two decimals; whole amounts print without a fraction.
fn to_major_units(minor: f64) -> String {
    let major = (minor / MINOR_UNITS_PER_MAJOR * 100.0).round() / 100.0;
    major.to_string()
}
