//! Session report and export functionality

use crate::keyboard::{get_key_info, KeyEvent};
use crate::metrics::MetricsResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete session report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Metrics at the time of the report
    pub metrics: MetricsResult,
    /// Every recorded keystroke in press order
    pub events: Vec<EventEntry>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// Session duration in seconds
    pub duration_secs: f64,
    /// Characters in the text buffer
    pub typed_chars: usize,
}

/// One row of the keystroke table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventEntry {
    /// Typed character, or the key name for keys that type nothing
    pub key: String,
    /// Physical key code
    pub code: u16,
    pub down_ms: u64,
    pub up_ms: Option<u64>,
}

impl From<&KeyEvent> for EventEntry {
    fn from(event: &KeyEvent) -> Self {
        let key = match event.logical {
            Some(ch) => ch.to_string(),
            None => get_key_info(event.code).name.to_string(),
        };
        Self {
            key,
            code: event.code.as_u16(),
            down_ms: event.press_ms,
            up_ms: event.release_ms,
        }
    }
}

impl SessionReport {
    /// Create a new session report
    pub fn new(
        duration_secs: f64,
        events: &[KeyEvent],
        metrics: MetricsResult,
        typed_chars: usize,
    ) -> Self {
        let now: DateTime<Utc> = Utc::now();

        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                duration_secs,
                typed_chars,
            },
            metrics,
            events: events.iter().map(EventEntry::from).collect(),
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
