use crate::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub debounce_ms: u64,
    pub default_center: GeoPoint,
    pub default_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("debounce_ms", &self.debounce_ms)
            .field(
                "default_center",
                &format_args!("{},{}", self.default_center.lat, self.default_center.lng),
            )
            .field("default_zoom", &self.default_zoom)
            .field("zoom_range", &format_args!("{}..={}", self.min_zoom, self.max_zoom))
            .field(
                "viewport",
                &format_args!("{}x{}", self.viewport_width, self.viewport_height),
            )
            .finish()
    }
}
