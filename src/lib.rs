//! Keystroke Dynamics - typing-rhythm capture and metrics
//!
//! Records key press/release timing, derives dwell, flight, trajectory,
//! speed and regularity metrics from it, and submits the result to a
//! metrics ingest endpoint.
//!
//! ```
//! use keystroke_dynamics::keyboard::{EventRecorder, KeyCode};
//! use keystroke_dynamics::metrics::MetricsCalculator;
//!
//! let mut recorder = EventRecorder::new();
//! recorder.on_press(KeyCode(30), Some('a'), 0);
//! recorder.on_release(KeyCode(30), 100);
//! recorder.on_press(KeyCode(31), Some('s'), 150);
//! recorder.on_release(KeyCode(31), 200);
//!
//! let metrics = MetricsCalculator::compute(recorder.events(), 2);
//! assert_eq!(metrics.avg_dwell_time, 75.0);
//! assert_eq!(metrics.avg_flight_time, 50.0);
//! assert_eq!(metrics.h_score, 1.0);
//! ```

pub mod config;
pub mod export;
pub mod keyboard;
pub mod metrics;
pub mod report;
pub mod ui;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use export::{Ack, Exporter, TransportFailure};
pub use keyboard::{EventRecorder, KeyEvent};
pub use metrics::{MetricsCalculator, MetricsResult};
