//! ER wait-time estimator CLI.
//!
//! Loads the hospital directory and API keys, fetches live traffic and
//! weather signals, and prints a confidence-rated wait-time estimate for
//! each requested hospital.

mod config;

use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use common::{Hospital, ResponseCache};
use estimator::{format_wait_time_message, WaitEstimator};
use traffic_client::TrafficClient;
use weather_client::WeatherClient;

/// ER wait-time estimator
#[derive(Parser)]
#[command(name = "er-wait-estimator", about = "Estimate ER wait times for configured hospitals")]
struct Cli {
    /// Estimate a single hospital by (partial) name; defaults to all.
    #[arg(long)]
    hospital: Option<String>,

    /// Live patient count, when known from the front desk.
    #[arg(long)]
    patients: Option<u32>,

    /// Emit raw estimates as JSON instead of formatted messages.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "er_wait_estimator=info,common=info,traffic_client=info,weather_client=info,estimator=info"
                    .into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Hospitals: {:?}",
        cfg.hospitals.iter().map(|h| &h.name).collect::<Vec<_>>()
    );
    info!(
        "Cache TTLs: default={}s weather={}s; traffic radius={}m; provider timeout={}s",
        cfg.cache.ttl_secs,
        cfg.cache.weather_ttl_secs,
        cfg.traffic.radius_m,
        cfg.timing.provider_timeout_secs,
    );

    let hospitals: Vec<Hospital> = match &cli.hospital {
        Some(name) => {
            let needle = name.to_lowercase();
            let matches: Vec<Hospital> = cfg
                .hospitals
                .iter()
                .filter(|h| h.name.to_lowercase().contains(&needle))
                .map(|h| h.to_hospital())
                .collect();
            if matches.is_empty() {
                error!("No configured hospital matches '{}'", name);
                std::process::exit(1);
            }
            matches
        }
        None => cfg.hospitals.iter().map(|h| h.to_hospital()).collect(),
    };

    // One cache instance shared by both providers for the process lifetime.
    let cache = ResponseCache::new();
    let traffic = TrafficClient::new(
        cfg.tomtom_api_key.clone(),
        cache.clone(),
        Duration::from_secs(cfg.cache.ttl_secs),
        cfg.traffic.radius_m,
    );
    let weather = WeatherClient::new(
        cfg.openweather_api_key.clone(),
        cache.clone(),
        Duration::from_secs(cfg.cache.weather_ttl_secs),
    );
    let wait_estimator = WaitEstimator::new(
        traffic,
        weather,
        Duration::from_secs(cfg.timing.provider_timeout_secs),
    );

    for hospital in &hospitals {
        let estimate = wait_estimator.estimate(hospital, cli.patients).await;

        if cli.json {
            let record = serde_json::json!({
                "hospital": hospital.name,
                "estimate": estimate,
            });
            match serde_json::to_string_pretty(&record) {
                Ok(out) => println!("{}", out),
                Err(e) => error!("Failed to serialize estimate for {}: {}", hospital.name, e),
            }
        } else {
            println!(
                "For {}:\n{}\n",
                hospital.name,
                format_wait_time_message(&estimate)
            );
        }
    }
}
