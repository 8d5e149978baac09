//! Configuration loader — merges env vars, .env file, and config.toml.

use common::{AppConfig, Error};
use std::path::Path;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_positive_u32(raw: &str, env_name: &str) -> Result<u32, Error> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.hospitals.is_empty() {
        issues.push("hospitals must contain at least one entry".into());
    }
    for hospital in &config.hospitals {
        if hospital.name.trim().is_empty() {
            issues.push("hospital name must not be empty".into());
        }
        if !(-90.0..=90.0).contains(&hospital.lat) {
            issues.push(format!("{}: lat must be in [-90, 90]", hospital.name));
        }
        if !(-180.0..=180.0).contains(&hospital.lon) {
            issues.push(format!("{}: lon must be in [-180, 180]", hospital.name));
        }
        if hospital.average_capacity <= 0.0 {
            issues.push(format!("{}: average_capacity must be > 0", hospital.name));
        }
    }

    if config.cache.ttl_secs == 0 {
        issues.push("cache.ttl_secs must be > 0".into());
    }
    if config.cache.weather_ttl_secs == 0 {
        issues.push("cache.weather_ttl_secs must be > 0".into());
    }
    if config.traffic.radius_m == 0 {
        issues.push("traffic.radius_m must be > 0".into());
    }
    if config.timing.provider_timeout_secs == 0 {
        issues.push("timing.provider_timeout_secs must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load application configuration from environment and optional config file.
pub fn load_config() -> Result<AppConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = AppConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(key) = std::env::var("TOMTOM_API_KEY") {
        config.tomtom_api_key = key;
    }
    if let Ok(key) = std::env::var("OPENWEATHER_API_KEY") {
        config.openweather_api_key = key;
    }
    if let Ok(raw) = std::env::var("ER_CACHE_TTL_SECS") {
        config.cache.ttl_secs = parse_positive_u64(&raw, "ER_CACHE_TTL_SECS")?;
    }
    if let Ok(raw) = std::env::var("ER_WEATHER_CACHE_TTL_SECS") {
        config.cache.weather_ttl_secs = parse_positive_u64(&raw, "ER_WEATHER_CACHE_TTL_SECS")?;
    }
    if let Ok(raw) = std::env::var("ER_TRAFFIC_RADIUS_M") {
        config.traffic.radius_m = parse_positive_u32(&raw, "ER_TRAFFIC_RADIUS_M")?;
    }
    if let Ok(raw) = std::env::var("ER_PROVIDER_TIMEOUT_SECS") {
        config.timing.provider_timeout_secs =
            parse_positive_u64(&raw, "ER_PROVIDER_TIMEOUT_SECS")?;
    }

    // 5. Validate required fields.
    if config.tomtom_api_key.is_empty() {
        return Err(Error::Config(
            "TOMTOM_API_KEY is required (set in .env, environment, or config.toml)".into(),
        ));
    }
    if config.openweather_api_key.is_empty() {
        return Err(Error::Config(
            "OPENWEATHER_API_KEY is required (set in .env, environment, or config.toml)".into(),
        ));
    }

    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::HospitalConfig;

    fn valid_config() -> AppConfig {
        AppConfig {
            tomtom_api_key: "tt".into(),
            openweather_api_key: "ow".into(),
            hospitals: vec![HospitalConfig {
                name: "General Hospital".into(),
                lat: 40.7,
                lon: -74.0,
                average_capacity: 50.0,
            }],
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_hospitals_rejected() {
        let mut config = valid_config();
        config.hospitals.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_capacity_and_coordinates_rejected() {
        let mut config = valid_config();
        config.hospitals[0].average_capacity = 0.0;
        config.hospitals[0].lat = 120.0;

        let err = validate_config(&config).expect_err("config should be rejected");
        let text = err.to_string();
        assert!(text.contains("average_capacity"));
        assert!(text.contains("lat"));
    }

    #[test]
    fn test_parse_positive_rejects_zero() {
        assert!(parse_positive_u64("0", "X").is_err());
        assert!(parse_positive_u64("abc", "X").is_err());
        assert_eq!(parse_positive_u64(" 42 ", "X").expect("parses"), 42);
    }
}
