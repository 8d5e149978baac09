//! ER wait-time estimation engine.
//!
//! Combines historical time-of-day baselines with live traffic and weather
//! signals into a confidence-rated estimate, and renders it for display.

pub mod engine;
pub mod format;
pub mod patterns;

pub use engine::WaitEstimator;
pub use format::format_wait_time_message;
