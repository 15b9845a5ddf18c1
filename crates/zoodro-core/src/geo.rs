//! Geographic value types shared by the geocoder, the API client and the
//! fetch coordinator.

use serde::{Deserialize, Serialize};

use crate::projection;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when latitude is within [-90, 90] and longitude within
    /// [-180, 180]. NaN coordinates are never valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance to `other` in kilometres (haversine).
    #[must_use]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// The four geographic corners of the visible pixel area of the map.
///
/// Recomputed on every viewport change. Corners are not clamped: at extreme
/// zoom/size combinations they may fall outside the valid coordinate range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub top_left: GeoPoint,
    pub top_right: GeoPoint,
    pub bottom_left: GeoPoint,
    pub bottom_right: GeoPoint,
}

impl ViewportBounds {
    /// Inclusive axis-aligned containment test against the box spanned by
    /// `top_left` and `bottom_right`. No antimeridian handling.
    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.bottom_right.lat..=self.top_left.lat).contains(&point.lat)
            && (self.top_left.lng..=self.bottom_right.lng).contains(&point.lng)
    }

    /// Per-axis average of the four corners.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        let corners = [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ];
        let lat = corners.iter().map(|c| c.lat).sum::<f64>() / 4.0;
        let lng = corners.iter().map(|c| c.lng).sum::<f64>() / 4.0;
        GeoPoint::new(lat, lng)
    }
}

/// What the map widget currently shows: a center, a (possibly fractional)
/// zoom level and the pixel size of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: f64,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl MapView {
    #[must_use]
    pub const fn new(center: GeoPoint, zoom: f64, pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            center,
            zoom,
            pixel_width,
            pixel_height,
        }
    }

    /// Returns a copy with the zoom level clamped into `[min_zoom, max_zoom]`.
    #[must_use]
    pub fn with_zoom_clamped(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
        self
    }

    #[must_use]
    pub fn bounds(&self) -> ViewportBounds {
        projection::corner_coordinates(
            self.center.lat,
            self.center.lng,
            self.zoom,
            self.pixel_width,
            self.pixel_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_valid_accepts_range_edges() {
        assert!(GeoPoint::new(90.0, 180.0).is_valid());
        assert!(GeoPoint::new(-90.0, -180.0).is_valid());
    }

    #[test]
    fn is_valid_rejects_out_of_range_and_nan() {
        assert!(!GeoPoint::new(90.1, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.5).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(35.6892, 51.389);
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn distance_tehran_to_isfahan_is_roughly_340_km() {
        let tehran = GeoPoint::new(35.6892, 51.389);
        let isfahan = GeoPoint::new(32.6546, 51.668);
        let d = tehran.distance_km(&isfahan);
        assert!((330.0..350.0).contains(&d), "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        assert!((a.distance_km(&b) - 111.19).abs() < 0.1);
    }

    #[test]
    fn contains_is_inclusive_of_edges() {
        let view = MapView::new(GeoPoint::new(35.6892, 51.389), 14.0, 1024, 768);
        let bounds = view.bounds();
        assert!(bounds.contains(&view.center));
        assert!(bounds.contains(&bounds.top_left));
        assert!(bounds.contains(&bounds.bottom_right));
        assert!(!bounds.contains(&GeoPoint::new(36.0, 51.389)));
    }

    #[test]
    fn with_zoom_clamped_limits_zoom() {
        let view = MapView::new(GeoPoint::new(0.0, 0.0), 8.0, 100, 100);
        assert!((view.with_zoom_clamped(14.0, 18.0).zoom - 14.0).abs() < f64::EPSILON);
        let view = MapView::new(GeoPoint::new(0.0, 0.0), 19.5, 100, 100);
        assert!((view.with_zoom_clamped(14.0, 18.0).zoom - 18.0).abs() < f64::EPSILON);
    }
}
