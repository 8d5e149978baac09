//! Application configuration types.

use crate::types::{GeoPoint, Hospital};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// TomTom traffic API key.
    #[serde(default)]
    pub tomtom_api_key: String,

    /// OpenWeather API key.
    #[serde(default)]
    pub openweather_api_key: String,

    /// Hospitals the estimator can be asked about.
    #[serde(default)]
    pub hospitals: Vec<HospitalConfig>,

    /// Response cache durations.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Traffic query parameters.
    #[serde(default)]
    pub traffic: TrafficConfig,

    /// Timing parameters (seconds).
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Configuration for a single hospital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalConfig {
    /// Human-readable name.
    pub name: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Average ER capacity (patients), must be > 0.
    pub average_capacity: f64,
}

impl HospitalConfig {
    pub fn to_hospital(&self) -> Hospital {
        Hospital {
            name: self.name.clone(),
            position: GeoPoint {
                latitude: self.lat,
                longitude: self.lon,
            },
            average_capacity: self.average_capacity,
        }
    }
}

/// Response cache durations (all values in seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default TTL for API responses.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,

    /// Longer TTL for weather responses, which change slowly.
    #[serde(default = "default_weather_ttl")]
    pub weather_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            weather_ttl_secs: default_weather_ttl(),
        }
    }
}

/// Traffic query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficConfig {
    /// Search radius around the hospital, in meters.
    #[serde(default = "default_traffic_radius")]
    pub radius_m: u32,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            radius_m: default_traffic_radius(),
        }
    }
}

/// Timing configuration (all values in seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Hard deadline for each signal provider fetch. On expiry the
    /// provider's contribution degrades to "unknown" instead of stalling
    /// the estimate.
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            provider_timeout_secs: default_provider_timeout(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

fn default_weather_ttl() -> u64 {
    1800 // 30 minutes
}

fn default_traffic_radius() -> u32 {
    2000
}

fn default_provider_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.cache.ttl_secs, 300);
        assert_eq!(cfg.cache.weather_ttl_secs, 1800);
        assert_eq!(cfg.traffic.radius_m, 2000);
        assert_eq!(cfg.timing.provider_timeout_secs, 5);
        assert!(cfg.hospitals.is_empty());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let raw = r#"
            tomtom_api_key = "tt-key"
            openweather_api_key = "ow-key"

            [[hospitals]]
            name = "General Hospital"
            lat = 40.7128
            lon = -74.0060
            average_capacity = 50.0
        "#;

        let cfg: AppConfig = toml::from_str(raw).expect("config should parse");
        assert_eq!(cfg.hospitals.len(), 1);
        let hospital = cfg.hospitals[0].to_hospital();
        assert_eq!(hospital.name, "General Hospital");
        assert!((hospital.position.latitude - 40.7128).abs() < 1e-9);
        assert!((hospital.average_capacity - 50.0).abs() < f64::EPSILON);
        assert_eq!(cfg.cache.weather_ttl_secs, 1800);
    }
}
