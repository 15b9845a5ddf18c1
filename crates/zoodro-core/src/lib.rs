//! Core domain types for the zoodro vendor map.
//!
//! Holds the geographic value types, the Web Mercator viewport geocoder,
//! vendor records as returned by the vendor API, and environment-driven
//! application configuration. Nothing here performs network I/O.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod location;
pub mod projection;
pub mod vendor;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{GeoPoint, MapView, ViewportBounds};
pub use location::{resolve_initial_view, GeolocationError, InitialView};
pub use projection::corner_coordinates;
pub use vendor::{OfferLimits, VendorRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
