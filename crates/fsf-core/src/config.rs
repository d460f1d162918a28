use crate::app_config::{AppConfig, Environment};
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
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;
    use std::time::Duration;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u8 = |var: &str, default: &str| -> Result<u8, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u8>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_km = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "must be a finite number".to_string()))
        }
    };

    let env = parse_environment(&or_default("FSF_ENV", "development"))?;
    let log_level = or_default("FSF_LOG_LEVEL", env.default_log_level());
    let listings_path = PathBuf::from(or_default("FSF_LISTINGS_PATH", "./data/db.json"));
    let maps_api_key = lookup("FSF_MAPS_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());

    let timeout_ms = parse_u64("FSF_GEOLOCATION_TIMEOUT_MS", "10000")?;
    if timeout_ms == 0 {
        return Err(invalid(
            "FSF_GEOLOCATION_TIMEOUT_MS",
            "must be greater than zero".to_string(),
        ));
    }

    let default_radius_km = parse_km("FSF_DEFAULT_RADIUS_KM", "5")?;
    let radius_min_km = parse_km("FSF_RADIUS_MIN_KM", "1")?;
    let radius_max_km = parse_km("FSF_RADIUS_MAX_KM", "50")?;
    let map_zoom = parse_u8("FSF_MAP_ZOOM", "14")?;

    let config = AppConfig {
        env,
        log_level,
        listings_path,
        maps_api_key,
        geolocation_timeout: Duration::from_millis(timeout_ms),
        default_radius_km,
        radius_min_km,
        radius_max_km,
        map_zoom,
    };
    validate_app_config(&config)?;
    Ok(config)
}

fn validate_app_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.radius_min_km <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "radius minimum must be positive, got {}",
            config.radius_min_km
        )));
    }
    if config.radius_min_km > config.radius_max_km {
        return Err(ConfigError::Validation(format!(
            "radius minimum {} exceeds maximum {}",
            config.radius_min_km, config.radius_max_km
        )));
    }
    if !(config.radius_min_km..=config.radius_max_km).contains(&config.default_radius_km) {
        return Err(ConfigError::Validation(format!(
            "default radius {} must lie within [{}, {}]",
            config.default_radius_km, config.radius_min_km, config.radius_max_km
        )));
    }
    if config.map_zoom > 21 {
        return Err(ConfigError::Validation(format!(
            "map zoom {} must be at most 21",
            config.map_zoom
        )));
    }
    Ok(())
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FSF_ENV".to_string(),
            reason: format!(
                "unknown environment '{other}'; expected development, test, or production"
            ),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
