//! OpenWeather current-conditions client.
//!
//! Fetches current weather for a point and reduces temperature, condition,
//! and pressure into a risk factor for the wait-time estimator.

use common::{Error, GeoPoint, ResponseCache, WeatherFactor, WeatherRisk};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const KELVIN_OFFSET: f64 = 273.15;

const MAX_ERROR_BODY_BYTES: usize = 500;

/// Truncate an upstream error body without splitting a UTF-8 codepoint.
fn truncate_body(body: &str) -> &str {
    if body.len() <= MAX_ERROR_BODY_BYTES {
        return body;
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// OpenWeather API client with connection pooling and a shared cache.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    api_key: String,
    cache: ResponseCache,
    cache_ttl: Duration,
}

// ── OpenWeather response types ────────────────────────────────────────

/// Response from the current-weather endpoint.
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub main: WeatherMain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherCondition {
    /// Primary category, e.g. "Rain", "Thunderstorm".
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherMain {
    /// Temperature in Kelvin.
    pub temp: f64,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
}

// ── Implementation ────────────────────────────────────────────────────

impl WeatherClient {
    pub fn new(api_key: String, cache: ResponseCache, cache_ttl: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("er-wait-estimator/0.1")
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build weather HTTP client");

        Self {
            client,
            api_key,
            cache,
            cache_ttl,
        }
    }

    /// Current weather conditions at a point.
    ///
    /// Network and parse failures surface as `Err`; the estimator decides
    /// how to degrade them.
    pub async fn current_conditions(&self, point: GeoPoint) -> Result<WeatherFactor, Error> {
        let url = format!(
            "{}?lat={}&lon={}&appid={}",
            CURRENT_WEATHER_URL, point.latitude, point.longitude, self.api_key
        );

        let payload = self
            .cache
            .get_or_fetch(&url, self.cache_ttl, || async {
                debug!(
                    "Fetching current weather: lat={} lon={}",
                    point.latitude, point.longitude
                );

                let resp = self
                    .client
                    .get(&url)
                    .header("Accept", "application/json")
                    .send()
                    .await
                    .map_err(|e| Error::Weather(format!("HTTP error: {e}")))?;

                let status = resp.status().as_u16();
                if status != 200 {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(Error::Weather(format!(
                        "OpenWeather returned {}: {}",
                        status,
                        truncate_body(&body)
                    )));
                }

                resp.json()
                    .await
                    .map_err(|e| Error::Weather(format!("JSON parse error: {e}")))
            })
            .await?;

        let parsed: CurrentWeatherResponse = serde_json::from_value(payload)?;
        let factor = derive_weather_factor(&parsed)?;

        debug!(
            "Weather at ({}, {}): condition={} temp={:.1}°C risk={} factor={:.2}",
            point.latitude,
            point.longitude,
            factor.condition,
            factor.temperature_c.unwrap_or(f64::NAN),
            factor.risk,
            factor.factor
        );

        Ok(factor)
    }
}

/// Reduce a current-weather payload to a multiplicative wait-time factor.
///
/// Rules are applied in a fixed order; a later rule may overwrite the risk
/// assigned by an earlier one, matching the layered scoring of the factors:
/// temperature band, then condition keyword, then low atmospheric pressure.
pub fn derive_weather_factor(resp: &CurrentWeatherResponse) -> Result<WeatherFactor, Error> {
    let condition = resp
        .weather
        .first()
        .ok_or_else(|| Error::Weather("no weather condition in response".into()))?;

    let temp_c = resp.main.temp - KELVIN_OFFSET;

    let mut factor = 1.0;
    let mut risk = WeatherRisk::Low;

    // Temperature impact.
    if temp_c < 0.0 || temp_c > 35.0 {
        factor *= 1.3; // Extreme temperatures.
        risk = WeatherRisk::High;
    } else if temp_c < 5.0 || temp_c > 30.0 {
        factor *= 1.2; // Uncomfortable temperatures.
        risk = WeatherRisk::Moderate;
    }

    // Condition impact.
    match condition.main.to_lowercase().as_str() {
        "thunderstorm" => {
            factor *= 1.5;
            risk = WeatherRisk::High;
        }
        "snow" | "rain" => {
            factor *= 1.3;
            risk = WeatherRisk::Moderate;
        }
        "drizzle" | "fog" => {
            factor *= 1.1;
            risk = WeatherRisk::Low;
        }
        _ => {}
    }

    // Low pressure systems can affect health; factor only, risk untouched.
    if let Some(pressure) = resp.main.pressure {
        if pressure < 1000.0 {
            factor *= 1.1;
        }
    }

    Ok(WeatherFactor {
        factor,
        condition: condition.main.clone(),
        temperature_c: Some(temp_c),
        risk,
        description: Some(condition.description.clone()),
        humidity: resp.main.humidity,
        pressure: resp.main.pressure,
    })
}
