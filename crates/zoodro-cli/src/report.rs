//! Plain-text output for the CLI commands.

use std::fmt::Write as _;

use zoodro_core::{GeoPoint, MapView, VendorRecord};

pub(crate) fn print_corners(view: &MapView) {
    print!("{}", format_corners(view));
}

pub(crate) fn print_vendors(center: GeoPoint, vendors: &[VendorRecord]) {
    print!("{}", format_vendors(center, vendors));
}

pub(crate) fn format_corners(view: &MapView) -> String {
    let bounds = view.bounds();
    let mut out = String::new();
    for (label, corner) in [
        ("top_left", bounds.top_left),
        ("top_right", bounds.top_right),
        ("bottom_left", bounds.bottom_left),
        ("bottom_right", bounds.bottom_right),
    ] {
        let _ = writeln!(out, "{label:<13}{:.6}, {:.6}", corner.lat, corner.lng);
    }
    out
}

/// One line per vendor, nearest first.
pub(crate) fn format_vendors(center: GeoPoint, vendors: &[VendorRecord]) -> String {
    let mut rows: Vec<(f64, &VendorRecord)> = vendors
        .iter()
        .map(|v| (center.distance_km(&v.location()), v))
        .collect();
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} vendor{} near {:.4}, {:.4}",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" },
        center.lat,
        center.lng
    );
    for (km, vendor) in rows {
        let name = if vendor.name.is_empty() {
            "(unnamed)"
        } else {
            vendor.name.as_str()
        };
        let _ = writeln!(
            out,
            "{km:>7.2} km  {name}  {}% off  ({})",
            vendor.off,
            vendor.offer_limits().summary()
        );
    }
    out
}
