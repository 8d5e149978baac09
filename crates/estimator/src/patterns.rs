//! Historical wait-time baselines by day type and time-of-day bucket.

use common::{DayType, TimeBucket};

/// Baseline wait and multiplier for one table cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalPattern {
    /// Multiplier applied to the baseline.
    pub factor: f64,
    /// Baseline wait in minutes.
    pub baseline_minutes: f64,
    /// Whether this bucket is a high-demand period.
    pub peak: bool,
}

const fn cell(factor: f64, baseline_minutes: f64, peak: bool) -> HistoricalPattern {
    HistoricalPattern {
        factor,
        baseline_minutes,
        peak,
    }
}

/// Fixed reference data; never mutated at runtime.
pub fn lookup(day_type: DayType, bucket: TimeBucket) -> HistoricalPattern {
    match (day_type, bucket) {
        (DayType::Weekday, TimeBucket::Morning) => cell(1.2, 30.0, false),
        (DayType::Weekday, TimeBucket::Midday) => cell(1.0, 25.0, false),
        (DayType::Weekday, TimeBucket::Evening) => cell(1.4, 35.0, true),
        (DayType::Weekday, TimeBucket::Night) => cell(0.8, 20.0, false),
        (DayType::Weekend, TimeBucket::Morning) => cell(0.9, 25.0, false),
        (DayType::Weekend, TimeBucket::Midday) => cell(1.1, 30.0, true),
        (DayType::Weekend, TimeBucket::Evening) => cell(1.3, 35.0, true),
        (DayType::Weekend, TimeBucket::Night) => cell(1.0, 25.0, false),
    }
}
