//! Domain types shared across the estimator workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

// ── Geography ─────────────────────────────────────────────────────────

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A hospital as consumed by the estimator.
///
/// Owned by the hospital directory (config); the estimator only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub name: String,
    pub position: GeoPoint,
    /// Average ER capacity, used to scale an optional live patient count.
    pub average_capacity: f64,
}

// ── Traffic signal ────────────────────────────────────────────────────

/// Discrete congestion level around a hospital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Congestion {
    Light,
    Moderate,
    Heavy,
    Unknown,
}

impl fmt::Display for Congestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Congestion::Light => "light",
            Congestion::Moderate => "moderate",
            Congestion::Heavy => "heavy",
            Congestion::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Traffic contribution to the wait-time estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficFactor {
    /// Multiplier applied to the baseline wait (1.0–1.4).
    pub factor: f64,
    pub congestion: Congestion,
    /// Average ratio of current to free-flow speed.
    pub flow: f64,
}

impl TrafficFactor {
    /// Neutral factor used when the traffic provider is unavailable.
    pub fn unknown() -> Self {
        Self {
            factor: 1.0,
            congestion: Congestion::Unknown,
            flow: 1.0,
        }
    }
}

// ── Weather signal ────────────────────────────────────────────────────

/// Qualitative health risk attributed to current weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherRisk {
    Low,
    Moderate,
    High,
    Unknown,
}

impl fmt::Display for WeatherRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WeatherRisk::Low => "low",
            WeatherRisk::Moderate => "moderate",
            WeatherRisk::High => "high",
            WeatherRisk::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Weather contribution to the wait-time estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherFactor {
    /// Multiplier applied to the baseline wait (≥1.0, multiplicative).
    pub factor: f64,
    /// Primary weather category, e.g. "Rain"; "unknown" when unavailable.
    pub condition: String,
    pub temperature_c: Option<f64>,
    pub risk: WeatherRisk,
    pub description: Option<String>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

impl WeatherFactor {
    /// Neutral factor used when the weather provider is unavailable.
    pub fn unknown() -> Self {
        Self {
            factor: 1.0,
            condition: "unknown".to_string(),
            temperature_c: None,
            risk: WeatherRisk::Unknown,
            description: None,
            humidity: None,
            pressure: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.condition == "unknown"
    }
}

// ── Time buckets ──────────────────────────────────────────────────────

/// Time-of-day bucket used by the historical pattern table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Morning,
    Midday,
    Evening,
    Night,
}

impl TimeBucket {
    /// Bucket for an hour of day (0–23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=9 => TimeBucket::Morning,
            10..=15 => TimeBucket::Midday,
            16..=21 => TimeBucket::Evening,
            _ => TimeBucket::Night,
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeBucket::Morning => "morning",
            TimeBucket::Midday => "midday",
            TimeBucket::Evening => "evening",
            TimeBucket::Night => "night",
        };
        f.write_str(label)
    }
}

/// Weekday/weekend split used by the historical pattern table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    /// Day type from a numeric weekday where Sunday = 0 through Saturday = 6.
    pub fn from_weekday(number_from_sunday: u32) -> Self {
        if number_from_sunday == 0 || number_from_sunday == 6 {
            DayType::Weekend
        } else {
            DayType::Weekday
        }
    }

    pub fn is_weekend(self) -> bool {
        self == DayType::Weekend
    }
}

// ── Estimate output ───────────────────────────────────────────────────

/// How many independent signals contributed to an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(label)
    }
}

/// A signal that contributed to the estimate, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceFactor {
    CurrentPatientLoad,
    HistoricalPatterns,
    RealTimeTraffic,
    WeatherConditions,
}

impl fmt::Display for ConfidenceFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceFactor::CurrentPatientLoad => "current patient load",
            ConfidenceFactor::HistoricalPatterns => "historical patterns",
            ConfidenceFactor::RealTimeTraffic => "real-time traffic",
            ConfidenceFactor::WeatherConditions => "weather conditions",
        };
        f.write_str(label)
    }
}

/// Weather fields surfaced in the estimate's factor breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub condition: String,
    /// Rounded to the nearest degree; absent when the provider was down.
    pub temperature_c: Option<i64>,
    pub risk: WeatherRisk,
}

/// Factor breakdown attached to every estimate.
///
/// `traffic` and `weather` are absent on the degraded (baseline-only) path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateFactors {
    pub time_of_day: TimeBucket,
    pub is_weekend: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic: Option<Congestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSummary>,
    #[serde(default)]
    pub is_peak_time: bool,
}

/// Supporting detail for the formatted message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateDetails {
    pub confidence_factors: Vec<ConfidenceFactor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

/// An ER wait-time estimate. Created fresh per call; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitEstimate {
    /// Always a non-negative multiple of five.
    pub estimated_wait_minutes: u32,
    pub confidence: Confidence,
    pub factors: EstimateFactors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<EstimateDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(TimeBucket::from_hour(5), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(6), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(9), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(10), TimeBucket::Midday);
        assert_eq!(TimeBucket::from_hour(15), TimeBucket::Midday);
        assert_eq!(TimeBucket::from_hour(16), TimeBucket::Evening);
        assert_eq!(TimeBucket::from_hour(21), TimeBucket::Evening);
        assert_eq!(TimeBucket::from_hour(22), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(0), TimeBucket::Night);
    }

    #[test]
    fn test_day_type_from_weekday() {
        assert_eq!(DayType::from_weekday(0), DayType::Weekend); // Sunday
        assert_eq!(DayType::from_weekday(3), DayType::Weekday); // Wednesday
        assert_eq!(DayType::from_weekday(6), DayType::Weekend); // Saturday
        assert!(DayType::from_weekday(6).is_weekend());
        assert!(!DayType::from_weekday(1).is_weekend());
    }

    #[test]
    fn test_unknown_factors_are_neutral() {
        let traffic = TrafficFactor::unknown();
        assert_eq!(traffic.congestion, Congestion::Unknown);
        assert!((traffic.factor - 1.0).abs() < f64::EPSILON);
        assert!((traffic.flow - 1.0).abs() < f64::EPSILON);

        let weather = WeatherFactor::unknown();
        assert!(weather.is_unknown());
        assert!((weather.factor - 1.0).abs() < f64::EPSILON);
        assert_eq!(weather.temperature_c, None);
        assert_eq!(weather.risk, WeatherRisk::Unknown);
    }

    #[test]
    fn test_confidence_factor_labels() {
        assert_eq!(
            ConfidenceFactor::CurrentPatientLoad.to_string(),
            "current patient load"
        );
        assert_eq!(
            ConfidenceFactor::RealTimeTraffic.to_string(),
            "real-time traffic"
        );
    }
}
