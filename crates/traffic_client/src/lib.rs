//! TomTom traffic-flow client.
//!
//! Queries flow-segment data around a geographic point and reduces it to a
//! unitless congestion factor for the wait-time estimator.

use common::{Congestion, Error, GeoPoint, ResponseCache, TrafficFactor};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const FLOW_SEGMENT_URL: &str =
    "https://api.tomtom.com/traffic/services/4/flowSegmentData/absolute/10/json";

/// Default search radius around the hospital, in meters.
pub const DEFAULT_RADIUS_M: u32 = 2000;

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

/// TomTom traffic API client with connection pooling and a shared cache.
#[derive(Debug, Clone)]
pub struct TrafficClient {
    client: reqwest::Client,
    api_key: String,
    cache: ResponseCache,
    cache_ttl: Duration,
    radius_m: u32,
}

// ── TomTom response types ─────────────────────────────────────────────

/// Response from the flow-segment endpoint.
#[derive(Debug, Deserialize)]
pub struct FlowSegmentResponse {
    #[serde(rename = "flowSegmentData", default)]
    pub flow_segment_data: Vec<FlowSegment>,
}

/// A single road segment near the queried point.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowSegment {
    #[serde(rename = "currentSpeed")]
    pub current_speed: f64,
    #[serde(rename = "freeFlowSpeed")]
    pub free_flow_speed: f64,
}

// ── Implementation ────────────────────────────────────────────────────

impl TrafficClient {
    pub fn new(api_key: String, cache: ResponseCache, cache_ttl: Duration, radius_m: u32) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("er-wait-estimator/0.1")
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build traffic HTTP client");

        Self {
            client,
            api_key,
            cache,
            cache_ttl,
            radius_m,
        }
    }

    /// Current traffic conditions around a point.
    ///
    /// Network and parse failures surface as `Err`; the estimator decides
    /// how to degrade them.
    pub async fn current_conditions(&self, point: GeoPoint) -> Result<TrafficFactor, Error> {
        let url = format!(
            "{}?key={}&point={},{}&radius={}",
            FLOW_SEGMENT_URL, self.api_key, point.latitude, point.longitude, self.radius_m
        );

        let payload = self
            .cache
            .get_or_fetch(&url, self.cache_ttl, || async {
                debug!(
                    "Fetching traffic flow: lat={} lon={} radius={}m",
                    point.latitude, point.longitude, self.radius_m
                );

                let resp = self
                    .client
                    .get(&url)
                    .header("Accept", "application/json")
                    .send()
                    .await
                    .map_err(|e| Error::Traffic(format!("HTTP error: {e}")))?;

                let status = resp.status().as_u16();
                if status != 200 {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(Error::Traffic(format!(
                        "TomTom returned {}: {}",
                        status,
                        truncate_body(&body)
                    )));
                }

                resp.json()
                    .await
                    .map_err(|e| Error::Traffic(format!("JSON parse error: {e}")))
            })
            .await?;

        let parsed: FlowSegmentResponse = serde_json::from_value(payload)?;
        let avg_flow = average_flow_ratio(&parsed.flow_segment_data);
        let factor = classify_flow(avg_flow);

        debug!(
            "Traffic near ({}, {}): avg_flow={:.2} congestion={}",
            point.latitude, point.longitude, avg_flow, factor.congestion
        );

        Ok(factor)
    }
}

/// Average ratio of current to free-flow speed across usable segments.
///
/// Segments with a non-positive free-flow speed are skipped; with no usable
/// segments the roads are treated as fully free-flowing (ratio 1.0).
pub fn average_flow_ratio(segments: &[FlowSegment]) -> f64 {
    let ratios: Vec<f64> = segments
        .iter()
        .filter(|s| s.free_flow_speed > 0.0)
        .map(|s| s.current_speed / s.free_flow_speed)
        .collect();

    if ratios.is_empty() {
        return 1.0;
    }

    ratios.iter().sum::<f64>() / ratios.len() as f64
}

/// Map an average flow ratio to a discrete congestion factor.
pub fn classify_flow(avg_flow: f64) -> TrafficFactor {
    let (factor, congestion) = if avg_flow < 0.5 {
        (1.4, Congestion::Heavy)
    } else if avg_flow < 0.8 {
        (1.2, Congestion::Moderate)
    } else {
        (1.0, Congestion::Light)
    };

    TrafficFactor {
        factor,
        congestion,
        flow: avg_flow,
    }
}
