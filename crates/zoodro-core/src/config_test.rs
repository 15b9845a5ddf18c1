use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn assert_invalid(map: &HashMap<&str, &str>, expected_var: &str) {
    let result = build_app_config(lookup_from_map(map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected_var),
        "expected InvalidEnvVar({expected_var}), got: {result:?}"
    );
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "ZOODRO_ENV"));
}

#[test]
fn build_app_config_defaults_from_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.api_base_url, "https://zooodro-be-go.liara.run");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "zoodro/0.1 (vendor-map)");
    assert_eq!(cfg.debounce_ms, 100);
    assert_eq!(cfg.default_center, GeoPoint::new(35.6892, 51.389));
    assert!((cfg.default_zoom - 14.0).abs() < f64::EPSILON);
    assert!((cfg.min_zoom - 14.0).abs() < f64::EPSILON);
    assert!((cfg.max_zoom - 18.0).abs() < f64::EPSILON);
    assert_eq!(cfg.viewport_width, 1024);
    assert_eq!(cfg.viewport_height, 768);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("ZOODRO_ENV", "production");
    map.insert("ZOODRO_API_BASE_URL", "http://localhost:8080");
    map.insert("ZOODRO_DEBOUNCE_MS", "250");
    map.insert("ZOODRO_DEFAULT_CENTER_LAT", "32.6546");
    map.insert("ZOODRO_DEFAULT_CENTER_LNG", "51.668");
    map.insert("ZOODRO_VIEWPORT_WIDTH", "1920");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.api_base_url, "http://localhost:8080");
    assert_eq!(cfg.debounce_ms, 250);
    assert_eq!(cfg.default_center, GeoPoint::new(32.6546, 51.668));
    assert_eq!(cfg.viewport_width, 1920);
}

#[test]
fn build_app_config_default_zoom_is_clamped_into_limits() {
    let mut map = HashMap::new();
    map.insert("ZOODRO_DEFAULT_ZOOM", "8");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.default_zoom - 14.0).abs() < f64::EPSILON);
}

#[test]
fn build_app_config_rejects_invalid_debounce() {
    let mut map = HashMap::new();
    map.insert("ZOODRO_DEBOUNCE_MS", "soon");
    assert_invalid(&map, "ZOODRO_DEBOUNCE_MS");
}

#[test]
fn build_app_config_rejects_out_of_range_center() {
    let mut map = HashMap::new();
    map.insert("ZOODRO_DEFAULT_CENTER_LAT", "91");
    assert_invalid(&map, "ZOODRO_DEFAULT_CENTER_LAT");

    let mut map = HashMap::new();
    map.insert("ZOODRO_DEFAULT_CENTER_LNG", "-200");
    assert_invalid(&map, "ZOODRO_DEFAULT_CENTER_LNG");
}

#[test]
fn build_app_config_rejects_non_finite_center() {
    let mut map = HashMap::new();
    map.insert("ZOODRO_DEFAULT_CENTER_LAT", "NaN");
    assert_invalid(&map, "ZOODRO_DEFAULT_CENTER_LAT");
}

#[test]
fn build_app_config_rejects_inverted_zoom_range() {
    let mut map = HashMap::new();
    map.insert("ZOODRO_MIN_ZOOM", "18");
    map.insert("ZOODRO_MAX_ZOOM", "14");
    assert_invalid(&map, "ZOODRO_MIN_ZOOM");
}

#[test]
fn build_app_config_rejects_zero_viewport() {
    let mut map = HashMap::new();
    map.insert("ZOODRO_VIEWPORT_HEIGHT", "0");
    assert_invalid(&map, "ZOODRO_VIEWPORT_HEIGHT");
}

#[test]
fn build_app_config_rejects_unknown_environment() {
    let mut map = HashMap::new();
    map.insert("ZOODRO_ENV", "staging");
    assert_invalid(&map, "ZOODRO_ENV");
}

#[test]
fn debug_output_is_compact() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(debug.contains("zoom_range: 14..=18"), "{debug}");
    assert!(debug.contains("viewport: 1024x768"), "{debug}");
}
