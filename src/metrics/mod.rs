//! Typing-rhythm metrics derived from a keystroke sequence
//!
//! Everything here is a pure function of the recorded keystrokes and the
//! number of characters in the text buffer. Sparse input never fails: each
//! metric falls back to a documented zero value instead.
//!
//! | metric | definition |
//! |--------|------------|
//! | `avgDwellTime` | mean of `release - press` over released keys |
//! | `avgFlightTime` | mean of `press(i+1) - release(i)` over adjacent keys |
//! | `flightStdDev` | population standard deviation of the flight times |
//! | `trajectoryAvg` | mean key-to-key travel on the layout map |
//! | `wpm` | `(chars / 5) * 60 / elapsed_secs` |
//! | `hScore` | `1 / (flightStdDev + 1)` |

pub mod stats;

use crate::keyboard::{KeyEvent, KeyboardLayoutMap};
use serde::{Deserialize, Serialize};

/// Characters per word for the WPM estimate
pub const CHARS_PER_WORD: f64 = 5.0;

/// One computed set of typing metrics.
///
/// Serializes to the flat wire record submitted to the ingest endpoint.
/// Equality compares the wire fields only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    /// Mean key hold time in ms
    #[serde(alias = "dwellAvg")]
    pub avg_dwell_time: f64,
    /// Mean release-to-next-press time in ms; may be negative when keys overlap
    #[serde(alias = "flightAvg")]
    pub avg_flight_time: f64,
    /// Population standard deviation of flight times in ms
    #[serde(default)]
    pub flight_std_dev: f64,
    /// Mean travel between consecutive letter keys, in key widths
    #[serde(alias = "trajAvg", default, skip_serializing_if = "Option::is_none")]
    pub trajectory_avg: Option<f64>,
    /// Estimated words per minute
    #[serde(default)]
    pub wpm: f64,
    /// Rhythm regularity score in (0, 1]
    #[serde(default = "max_h_score")]
    pub h_score: f64,
    /// Number of flight samples behind the averages; not on the wire
    #[serde(skip)]
    flight_samples: usize,
}

impl PartialEq for MetricsResult {
    fn eq(&self, other: &Self) -> bool {
        self.avg_dwell_time == other.avg_dwell_time
            && self.avg_flight_time == other.avg_flight_time
            && self.flight_std_dev == other.flight_std_dev
            && self.trajectory_avg == other.trajectory_avg
            && self.wpm == other.wpm
            && self.h_score == other.h_score
    }
}

fn max_h_score() -> f64 {
    1.0
}

impl Default for MetricsResult {
    fn default() -> Self {
        MetricsCalculator::compute(&[], 0)
    }
}

impl MetricsResult {
    /// Whether there were enough released keystrokes for a flight time.
    ///
    /// Without one, flight, deviation and score are only placeholder values.
    /// The sample count is not serialized, so a record read back from JSON
    /// always reports `false`.
    pub fn is_sufficient(&self) -> bool {
        self.flight_samples > 0
    }

    /// Labelled rows for display and reports
    pub fn summary(&self) -> Vec<MetricRow> {
        let mut rows = vec![
            MetricRow::info("Dwell Average", format!("{:.2} ms", self.avg_dwell_time)),
            MetricRow::info("Flight Average", format!("{:.2} ms", self.avg_flight_time)),
            MetricRow::info("Flight Std Dev", format!("{:.2} ms", self.flight_std_dev)),
            MetricRow::info(
                "Trajectory Average",
                format!("{:.2}", self.trajectory_avg.unwrap_or(0.0)),
            ),
            MetricRow::info("Words per Minute", format!("{:.1}", self.wpm)),
        ];

        if self.is_sufficient() {
            rows.push(MetricRow::ok("H-Score", format!("{:.3}", self.h_score)));
        } else {
            rows.push(MetricRow::warning("H-Score", "not enough data"));
        }

        rows
    }
}

/// Derives `MetricsResult`s from keystroke sequences
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Compute every metric for `events`, with `typed_chars` characters
    /// currently in the text buffer.
    ///
    /// Keys still held down count for neither dwell nor flight.
    pub fn compute(events: &[KeyEvent], typed_chars: usize) -> MetricsResult {
        let dwells: Vec<f64> = events.iter().filter_map(KeyEvent::dwell_ms).collect();
        let flights = flight_times(events);
        let distances = trajectory_distances(events);

        let flight_std_dev = stats::population_std_dev(&flights).unwrap_or(0.0);
        let result = MetricsResult {
            avg_dwell_time: stats::mean(&dwells).unwrap_or(0.0),
            avg_flight_time: stats::mean(&flights).unwrap_or(0.0),
            flight_std_dev,
            trajectory_avg: stats::mean(&distances),
            wpm: words_per_minute(events, typed_chars),
            h_score: 1.0 / (flight_std_dev + 1.0),
            flight_samples: flights.len(),
        };

        log::debug!(
            "metrics over {} keystrokes ({} dwell, {} flight, {} trajectory samples)",
            events.len(),
            dwells.len(),
            flights.len(),
            distances.len()
        );
        result
    }
}

/// Release-to-next-press gaps, overlaps included as negative values
fn flight_times(events: &[KeyEvent]) -> Vec<f64> {
    events
        .windows(2)
        .filter_map(|pair| {
            pair[0]
                .release_ms
                .map(|release| pair[1].press_ms as f64 - release as f64)
        })
        .collect()
}

/// Travel distances between adjacent keystrokes on letter keys
fn trajectory_distances(events: &[KeyEvent]) -> Vec<f64> {
    events
        .windows(2)
        .filter_map(|pair| match (pair[0].logical, pair[1].logical) {
            (Some(from), Some(to)) => KeyboardLayoutMap::distance(from, to),
            _ => None,
        })
        .collect()
}

/// Elapsed time runs from the first press to the release of the last
/// released keystroke in sequence order.
fn words_per_minute(events: &[KeyEvent], typed_chars: usize) -> f64 {
    let Some(first) = events.first() else {
        return 0.0;
    };
    let Some(last_release) = events.iter().rev().find_map(|e| e.release_ms) else {
        return 0.0;
    };

    let elapsed_secs = (last_release as f64 - first.press_ms as f64) / 1000.0;
    if elapsed_secs <= 0.0 {
        return 0.0;
    }

    let words = typed_chars as f64 / CHARS_PER_WORD;
    words * 60.0 / elapsed_secs
}

/// A labelled metric value with a display status
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub label: String,
    pub value: String,
    pub status: RowStatus,
}

impl MetricRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>, status: RowStatus) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            status,
        }
    }

    pub fn ok(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, RowStatus::Ok)
    }

    pub fn warning(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, RowStatus::Warning)
    }

    pub fn info(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(label, value, RowStatus::Info)
    }
}

/// Status of a metric row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Ok,
    Warning,
    Info,
}
