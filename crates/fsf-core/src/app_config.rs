use std::path::PathBuf;
use std::time::Duration;

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

impl Environment {
    /// Tracing filter used when `FSF_LOG_LEVEL` is unset.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Test => "warn",
            Environment::Production => "info",
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub listings_path: PathBuf,
    pub maps_api_key: Option<String>,
    pub geolocation_timeout: Duration,
    pub default_radius_km: f64,
    pub radius_min_km: f64,
    pub radius_max_km: f64,
    pub map_zoom: u8,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("listings_path", &self.listings_path)
            .field(
                "maps_api_key",
                &self.maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geolocation_timeout", &self.geolocation_timeout)
            .field("default_radius_km", &self.default_radius_km)
            .field("radius_min_km", &self.radius_min_km)
            .field("radius_max_km", &self.radius_max_km)
            .field("map_zoom", &self.map_zoom)
            .finish()
    }
}
