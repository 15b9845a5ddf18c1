//! Parsing of `lat,lng[,zoom]` lines read by `zoodro watch`.

use thiserror::Error;
use zoodro_core::{GeoPoint, MapView};

#[derive(Debug, PartialEq, Eq, Error)]
pub(crate) enum ViewLineError {
    #[error("expected 2 or 3 comma-separated fields, got {0}")]
    FieldCount(usize),

    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("coordinates out of range")]
    OutOfRange,
}

/// Applies one input line to `previous`. The viewport size always carries
/// over; the zoom carries over when the line omits it.
pub(crate) fn parse(line: &str, previous: &MapView) -> Result<MapView, ViewLineError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if !(2..=3).contains(&fields.len()) {
        return Err(ViewLineError::FieldCount(fields.len()));
    }
    let number = |field: &str| {
        field
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ViewLineError::NotANumber(field.to_owned()))
    };

    let center = GeoPoint::new(number(fields[0])?, number(fields[1])?);
    if !center.is_valid() {
        return Err(ViewLineError::OutOfRange);
    }
    let zoom = match fields.get(2) {
        Some(field) => number(field)?,
        None => previous.zoom,
    };
    if zoom < 0.0 {
        return Err(ViewLineError::OutOfRange);
    }

    Ok(MapView {
        center,
        zoom,
        ..*previous
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: MapView = MapView::new(GeoPoint::new(35.6892, 51.389), 14.0, 800, 600);

    #[test]
    fn center_only_keeps_zoom_and_size() {
        let view = parse("35.7, 51.4", &BASE).unwrap();
        assert_eq!(view.center, GeoPoint::new(35.7, 51.4));
        assert!((view.zoom - 14.0).abs() < f64::EPSILON);
        assert_eq!((view.pixel_width, view.pixel_height), (800, 600));
    }

    #[test]
    fn third_field_sets_zoom() {
        let view = parse("-33.86,151.21,16.25", &BASE).unwrap();
        assert!((view.zoom - 16.25).abs() < f64::EPSILON);
        assert!((view.center.lat + 33.86).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(parse("35.7", &BASE), Err(ViewLineError::FieldCount(1)));
        assert_eq!(parse("1,2,3,4", &BASE), Err(ViewLineError::FieldCount(4)));
    }

    #[test]
    fn rejects_non_numeric_and_out_of_range() {
        assert_eq!(
            parse("north,51.4", &BASE),
            Err(ViewLineError::NotANumber("north".to_owned()))
        );
        assert_eq!(parse("NaN,51.4", &BASE), Err(ViewLineError::NotANumber("NaN".to_owned())));
        assert_eq!(parse("95,51.4", &BASE), Err(ViewLineError::OutOfRange));
        assert_eq!(parse("35.7,51.4,-2", &BASE), Err(ViewLineError::OutOfRange));
    }
}
