//! Web Mercator (slippy-map) projection for viewport geocoding.
//!
//! Converts between geographic coordinates and global pixel coordinates at a
//! given zoom level, with 256-pixel tiles. Zoom may be fractional; the scale
//! factor is `2^zoom` with a real exponent.
//!
//! Results are not clamped. At extreme zoom/viewport-size combinations a
//! corner longitude may land outside [-180, 180]; no antimeridian
//! wraparound is applied.

use std::f64::consts::PI;

use crate::geo::{GeoPoint, ViewportBounds};

/// Edge length of one map tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Width (and height) of the whole projected world in pixels at `zoom`.
#[must_use]
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

#[must_use]
pub fn lng_to_x(lng: f64, zoom: f64) -> f64 {
    (lng + 180.0) / 360.0 * world_size(zoom)
}

#[must_use]
pub fn x_to_lng(x: f64, zoom: f64) -> f64 {
    x / world_size(zoom) * 360.0 - 180.0
}

#[must_use]
pub fn lat_to_y(lat: f64, zoom: f64) -> f64 {
    let lat_rad = lat.to_radians();
    world_size(zoom) * (0.5 - lat_rad.tan().asinh() / (2.0 * PI))
}

#[must_use]
pub fn y_to_lat(y: f64, zoom: f64) -> f64 {
    let fraction = y / world_size(zoom);
    (PI - 2.0 * PI * fraction).sinh().atan().to_degrees()
}

/// Computes the geographic corners of a `pixel_width` x `pixel_height`
/// viewport centered on (`center_lat`, `center_lng`) at `zoom`.
///
/// The center is projected to global pixels, offset by half the viewport
/// size in each direction, and each corner is projected back. Screen-space
/// orientation is preserved: `top_left.lat >= bottom_left.lat` and
/// `top_left.lng <= top_right.lng`.
#[must_use]
pub fn corner_coordinates(
    center_lat: f64,
    center_lng: f64,
    zoom: f64,
    pixel_width: u32,
    pixel_height: u32,
) -> ViewportBounds {
    let x_center = lng_to_x(center_lng, zoom);
    let y_center = lat_to_y(center_lat, zoom);
    let half_width = f64::from(pixel_width) / 2.0;
    let half_height = f64::from(pixel_height) / 2.0;

    let left = x_to_lng(x_center - half_width, zoom);
    let right = x_to_lng(x_center + half_width, zoom);
    let top = y_to_lat(y_center - half_height, zoom);
    let bottom = y_to_lat(y_center + half_height, zoom);

    ViewportBounds {
        top_left: GeoPoint::new(top, left),
        top_right: GeoPoint::new(top, right),
        bottom_left: GeoPoint::new(bottom, left),
        bottom_right: GeoPoint::new(bottom, right),
    }
}
