use crate::app_config::{AppConfig, Environment};
use crate::geo::GeoPoint;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a working
/// configuration pointed at the production vendor API.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, format!("{raw} is not a finite number")))
        }
    };

    let parse_dimension = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let value = parse_u32(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("ZOODRO_ENV", "development"))?;
    let log_level = or_default("ZOODRO_LOG_LEVEL", "info");

    let api_base_url = or_default("ZOODRO_API_BASE_URL", "https://zooodro-be-go.liara.run");
    if api_base_url.trim().is_empty() {
        return Err(invalid("ZOODRO_API_BASE_URL", "must not be empty".to_string()));
    }
    let request_timeout_secs = parse_u64("ZOODRO_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ZOODRO_USER_AGENT", "zoodro/0.1 (vendor-map)");
    let debounce_ms = parse_u64("ZOODRO_DEBOUNCE_MS", "100")?;

    let default_lat = parse_f64("ZOODRO_DEFAULT_CENTER_LAT", "35.6892")?;
    if !(-90.0..=90.0).contains(&default_lat) {
        return Err(invalid(
            "ZOODRO_DEFAULT_CENTER_LAT",
            format!("{default_lat} is outside [-90, 90]"),
        ));
    }
    let default_lng = parse_f64("ZOODRO_DEFAULT_CENTER_LNG", "51.3890")?;
    if !(-180.0..=180.0).contains(&default_lng) {
        return Err(invalid(
            "ZOODRO_DEFAULT_CENTER_LNG",
            format!("{default_lng} is outside [-180, 180]"),
        ));
    }

    let min_zoom = parse_f64("ZOODRO_MIN_ZOOM", "14")?;
    let max_zoom = parse_f64("ZOODRO_MAX_ZOOM", "18")?;
    if min_zoom < 0.0 {
        return Err(invalid("ZOODRO_MIN_ZOOM", "must not be negative".to_string()));
    }
    if min_zoom > max_zoom {
        return Err(invalid(
            "ZOODRO_MIN_ZOOM",
            format!("{min_zoom} is greater than ZOODRO_MAX_ZOOM ({max_zoom})"),
        ));
    }
    let default_zoom = parse_f64("ZOODRO_DEFAULT_ZOOM", "14")?.clamp(min_zoom, max_zoom);

    let viewport_width = parse_dimension("ZOODRO_VIEWPORT_WIDTH", "1024")?;
    let viewport_height = parse_dimension("ZOODRO_VIEWPORT_HEIGHT", "768")?;

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        request_timeout_secs,
        user_agent,
        debounce_ms,
        default_center: GeoPoint::new(default_lat, default_lng),
        default_zoom,
        min_zoom,
        max_zoom,
        viewport_width,
        viewport_height,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ZOODRO_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
