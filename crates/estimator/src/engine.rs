//! Wait-time estimation engine.
//!
//! Looks up the historical baseline for the current time, fetches the
//! traffic and weather signals concurrently, and combines everything into a
//! `WaitEstimate`. The estimate call is infallible: a failing or slow signal
//! degrades to its neutral value, and total failure degrades to a
//! baseline-only estimate.

use std::time::Duration;

use chrono::{Datelike, Local, Timelike};
use common::{
    Confidence, ConfidenceFactor, Congestion, DayType, Error, EstimateDetails, EstimateFactors,
    Hospital, TimeBucket, TrafficFactor, WaitEstimate, WeatherFactor, WeatherSummary,
};
use tokio::time::timeout;
use tracing::warn;
use traffic_client::TrafficClient;
use weather_client::WeatherClient;

use crate::patterns::{self, HistoricalPattern};

/// The estimation engine. Cheap to clone; clients share connection pools
/// and the response cache.
#[derive(Debug, Clone)]
pub struct WaitEstimator {
    traffic: TrafficClient,
    weather: WeatherClient,
    provider_timeout: Duration,
}

impl WaitEstimator {
    pub fn new(traffic: TrafficClient, weather: WeatherClient, provider_timeout: Duration) -> Self {
        Self {
            traffic,
            weather,
            provider_timeout,
        }
    }

    /// Estimate the current ER wait for a hospital.
    ///
    /// `current_patients` is an optional live occupancy count; when absent
    /// the estimate rests on historical patterns plus live signals alone.
    /// Always resolves with an estimate, never an error.
    pub async fn estimate(
        &self,
        hospital: &Hospital,
        current_patients: Option<u32>,
    ) -> WaitEstimate {
        let now = Local::now();
        let bucket = TimeBucket::from_hour(now.hour());
        let day_type = DayType::from_weekday(now.weekday().num_days_from_sunday());
        let pattern = patterns::lookup(day_type, bucket);

        let deadline = self.provider_timeout;
        let traffic_task = {
            let client = self.traffic.clone();
            let point = hospital.position;
            tokio::spawn(async move {
                match timeout(deadline, client.current_conditions(point)).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::Timeout(deadline)),
                }
            })
        };
        let weather_task = {
            let client = self.weather.clone();
            let point = hospital.position;
            tokio::spawn(async move {
                match timeout(deadline, client.current_conditions(point)).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::Timeout(deadline)),
                }
            })
        };

        let (traffic_join, weather_join) = tokio::join!(traffic_task, weather_task);

        // Outer safety net: a panicked provider task must not surface to the
        // caller. Fall back to the baseline-only estimate.
        let (traffic_result, weather_result) = match (traffic_join, weather_join) {
            (Ok(t), Ok(w)) => (t, w),
            (t, w) => {
                if let Err(e) = t {
                    warn!("traffic task failed to join: {}", e);
                }
                if let Err(e) = w {
                    warn!("weather task failed to join: {}", e);
                }
                return degraded_estimate(&pattern, bucket, day_type);
            }
        };

        let traffic = flatten_traffic(traffic_result);
        let weather = flatten_weather(weather_result);

        assemble(
            hospital,
            current_patients,
            &pattern,
            bucket,
            day_type,
            &traffic,
            &weather,
        )
    }
}

fn flatten_traffic(result: Result<TrafficFactor, Error>) -> TrafficFactor {
    match result {
        Ok(traffic) => traffic,
        Err(e) => {
            warn!("traffic signal degraded: {}", e);
            TrafficFactor::unknown()
        }
    }
}

fn flatten_weather(result: Result<WeatherFactor, Error>) -> WeatherFactor {
    match result {
        Ok(weather) => weather,
        Err(e) => {
            warn!("weather signal degraded: {}", e);
            WeatherFactor::unknown()
        }
    }
}

/// Combine all factors into the final estimate.
fn assemble(
    hospital: &Hospital,
    current_patients: Option<u32>,
    pattern: &HistoricalPattern,
    bucket: TimeBucket,
    day_type: DayType,
    traffic: &TrafficFactor,
    weather: &WeatherFactor,
) -> WaitEstimate {
    let mut wait = pattern.baseline_minutes;
    let mut confidence_factors = Vec::new();

    if let Some(patients) = current_patients {
        wait *= patients as f64 / hospital.average_capacity;
        confidence_factors.push(ConfidenceFactor::CurrentPatientLoad);
    }

    wait *= pattern.factor;
    confidence_factors.push(ConfidenceFactor::HistoricalPatterns);

    if traffic.congestion != Congestion::Unknown {
        wait *= traffic.factor;
        confidence_factors.push(ConfidenceFactor::RealTimeTraffic);
    }

    if !weather.is_unknown() {
        wait *= weather.factor;
        confidence_factors.push(ConfidenceFactor::WeatherConditions);
    }

    let confidence = match confidence_factors.len() {
        n if n >= 3 => Confidence::High,
        2 => Confidence::Medium,
        _ => Confidence::Low,
    };

    WaitEstimate {
        estimated_wait_minutes: round_to_five(wait),
        confidence,
        factors: EstimateFactors {
            time_of_day: bucket,
            is_weekend: day_type.is_weekend(),
            traffic: Some(traffic.congestion),
            weather: Some(WeatherSummary {
                condition: weather.condition.clone(),
                temperature_c: weather.temperature_c.map(|t| t.round() as i64),
                risk: weather.risk,
            }),
            is_peak_time: pattern.peak,
        },
        details: Some(EstimateDetails {
            confidence_factors,
            weather_description: weather.description.clone(),
            humidity: weather.humidity,
            pressure: weather.pressure,
        }),
    }
}

/// Baseline-only estimate used when the signal pipeline fails outright.
fn degraded_estimate(
    pattern: &HistoricalPattern,
    bucket: TimeBucket,
    day_type: DayType,
) -> WaitEstimate {
    WaitEstimate {
        estimated_wait_minutes: pattern.baseline_minutes.max(0.0) as u32,
        confidence: Confidence::Low,
        factors: EstimateFactors {
            time_of_day: bucket,
            is_weekend: day_type.is_weekend(),
            traffic: None,
            weather: None,
            is_peak_time: false,
        },
        details: None,
    }
}

/// Round to the nearest five minutes, half up.
fn round_to_five(minutes: f64) -> u32 {
    ((minutes / 5.0).round() * 5.0).max(0.0) as u32
}
