//! Human-readable rendering of a `WaitEstimate`.

use common::{Congestion, WaitEstimate};

/// Build the multi-line explanation shown to the user.
///
/// Pure function. Tolerates the degraded estimate shape (no traffic, no
/// weather, no details) by omitting the corresponding lines.
pub fn format_wait_time_message(estimate: &WaitEstimate) -> String {
    let mut message = format!(
        "The estimated wait time is {} minutes",
        estimate.estimated_wait_minutes
    );

    let mut factors: Vec<String> = Vec::new();

    if let Some(congestion) = estimate.factors.traffic {
        if congestion != Congestion::Unknown {
            factors.push(format!("{} traffic conditions", congestion));
        }
    }

    if let Some(weather) = &estimate.factors.weather {
        if weather.condition != "unknown" {
            let temperature = weather
                .temperature_c
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string());
            factors.push(format!(
                "{} weather ({}°C, {} risk)",
                weather.condition.to_lowercase(),
                temperature,
                weather.risk
            ));
        }
    }

    factors.push(format!(
        "{} {} timing",
        estimate.factors.time_of_day,
        if estimate.factors.is_weekend {
            "weekend"
        } else {
            "weekday"
        }
    ));

    message.push_str(&format!(
        "\n\nFactors considered:\n- {}",
        factors.join("\n- ")
    ));

    if estimate.factors.is_peak_time {
        message.push_str("\n\n⚠️ Note: This is typically a peak time for ER visits.");
    }

    message.push_str(&format!(
        "\n\nConfidence Level: {}",
        estimate.confidence.to_string().to_uppercase()
    ));

    if let Some(details) = &estimate.details {
        let based_on: Vec<String> = details
            .confidence_factors
            .iter()
            .map(|f| f.to_string())
            .collect();
        message.push_str(&format!("\nBased on: {}", based_on.join(", ")));

        if let Some(description) = details
            .weather_description
            .as_deref()
            .filter(|d| !d.is_empty())
        {
            message.push_str(&format!("\nDetailed weather: {}", description));
            if let Some(humidity) = details.humidity {
                message.push_str(&format!(", {}% humidity", humidity));
            }
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{
        Confidence, ConfidenceFactor, EstimateDetails, EstimateFactors, TimeBucket, WeatherRisk,
        WeatherSummary,
    };

    fn full_estimate() -> WaitEstimate {
        WaitEstimate {
            estimated_wait_minutes: 45,
            confidence: Confidence::High,
            factors: EstimateFactors {
                time_of_day: TimeBucket::Evening,
                is_weekend: false,
                traffic: Some(Congestion::Moderate),
                weather: Some(WeatherSummary {
                    condition: "Rain".to_string(),
                    temperature_c: Some(12),
                    risk: WeatherRisk::Moderate,
                }),
                is_peak_time: true,
            },
            details: Some(EstimateDetails {
                confidence_factors: vec![
                    ConfidenceFactor::HistoricalPatterns,
                    ConfidenceFactor::RealTimeTraffic,
                    ConfidenceFactor::WeatherConditions,
                ],
                weather_description: Some("light rain".to_string()),
                humidity: Some(80.0),
                pressure: Some(1008.0),
            }),
        }
    }

    fn degraded_estimate() -> WaitEstimate {
        WaitEstimate {
            estimated_wait_minutes: 30,
            confidence: Confidence::Low,
            factors: EstimateFactors {
                time_of_day: TimeBucket::Morning,
                is_weekend: true,
                traffic: None,
                weather: None,
                is_peak_time: false,
            },
            details: None,
        }
    }

    #[test]
    fn test_full_estimate_message() {
        let message = format_wait_time_message(&full_estimate());

        assert!(message.starts_with("The estimated wait time is 45 minutes"));
        assert!(message.contains("- moderate traffic conditions"));
        assert!(message.contains("- rain weather (12°C, moderate risk)"));
        assert!(message.contains("- evening weekday timing"));
        assert!(message.contains("peak time for ER visits"));
        assert!(message.contains("Confidence Level: HIGH"));
        assert!(message
            .contains("Based on: historical patterns, real-time traffic, weather conditions"));
        assert!(message.contains("Detailed weather: light rain, 80% humidity"));
    }

    #[test]
    fn test_degraded_estimate_message() {
        let message = format_wait_time_message(&degraded_estimate());

        assert!(message.starts_with("The estimated wait time is 30 minutes"));
        assert!(message.contains("- morning weekend timing"));
        assert!(message.contains("Confidence Level: LOW"));
        assert!(!message.contains("traffic conditions"));
        assert!(!message.contains("weather ("));
        assert!(!message.contains("Based on:"));
        assert!(!message.contains("peak time"));
    }

    #[test]
    fn test_unknown_signals_are_omitted_from_factors() {
        let mut estimate = full_estimate();
        estimate.factors.traffic = Some(Congestion::Unknown);
        estimate.factors.weather = Some(WeatherSummary {
            condition: "unknown".to_string(),
            temperature_c: None,
            risk: WeatherRisk::Unknown,
        });
        estimate.factors.is_peak_time = false;
        estimate.details = Some(EstimateDetails {
            confidence_factors: vec![ConfidenceFactor::HistoricalPatterns],
            weather_description: None,
            humidity: None,
            pressure: None,
        });

        let message = format_wait_time_message(&estimate);

        assert!(!message.contains("traffic conditions"));
        assert!(!message.contains("weather ("));
        assert!(message.contains("- evening weekday timing"));
        assert!(message.contains("Based on: historical patterns"));
        assert!(!message.contains("Detailed weather"));
    }

    #[test]
    fn test_missing_humidity_omits_suffix() {
        let mut estimate = full_estimate();
        if let Some(details) = estimate.details.as_mut() {
            details.humidity = None;
        }

        let message = format_wait_time_message(&estimate);
        assert!(message.contains("Detailed weather: light rain"));
        assert!(!message.contains("% humidity"));
    }
}
