//! Initial map view resolution from an optional device location.
//!
//! Obtaining the device position is the job of the surrounding UI. This
//! module only decides which view the map starts on: the device position
//! when available, otherwise the configured default. A geolocation failure
//! is handed back to the caller to report; it never blocks the map.

use thiserror::Error;

use crate::geo::GeoPoint;

/// Zoom level used when centering on the device's own position.
pub const USER_LOCATION_ZOOM: f64 = 16.0;

/// Why the device position could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location access denied")]
    PermissionDenied,

    #[error("location information unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("geolocation is not supported")]
    Unsupported,
}

impl GeolocationError {
    /// Maps a W3C `GeolocationPositionError.code` (1, 2, 3) to a variant.
    /// Unknown codes are reported as [`GeolocationError::PositionUnavailable`].
    #[must_use]
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::PositionUnavailable,
        }
    }

    /// What the user can do about it.
    #[must_use]
    pub fn instructions(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "You have denied access to your location. Update your settings to allow location access."
            }
            Self::PositionUnavailable => {
                "Your location information is currently unavailable. Please try again later."
            }
            Self::Timeout => "The request to get your location timed out. Please try again.",
            Self::Unsupported => {
                "Please enable location services in your settings and try again."
            }
        }
    }
}

/// The view the map should start on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialView {
    pub center: GeoPoint,
    pub zoom: f64,
    /// Present when the device location was requested but not obtained.
    pub location_error: Option<GeolocationError>,
}

/// Picks the starting center and zoom.
///
/// A device position outside the valid coordinate range is treated as
/// [`GeolocationError::PositionUnavailable`].
#[must_use]
pub fn resolve_initial_view(
    device: Result<GeoPoint, GeolocationError>,
    default_center: GeoPoint,
    default_zoom: f64,
) -> InitialView {
    match device {
        Ok(center) if center.is_valid() => InitialView {
            center,
            zoom: USER_LOCATION_ZOOM,
            location_error: None,
        },
        Ok(_) => InitialView {
            center: default_center,
            zoom: default_zoom,
            location_error: Some(GeolocationError::PositionUnavailable),
        },
        Err(err) => InitialView {
            center: default_center,
            zoom: default_zoom,
            location_error: Some(err),
        },
    }
}
