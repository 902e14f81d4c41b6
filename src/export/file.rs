//! Outbox directory transport
//!
//! Writes each submission to its own JSON file, for offline use or for a
//! separate uploader to pick up.

use super::{Transport, TransportFailure, TransportResponse};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Writes metrics records into a directory
#[derive(Debug)]
pub struct FileTransport {
    dir: PathBuf,
    sequence: AtomicU64,
}

impl FileTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_path(&self) -> PathBuf {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        self.dir.join(format!("metrics_{}_{:04}.json", stamp, seq))
    }
}

impl Transport for FileTransport {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn post(&self, body: &str) -> Result<TransportResponse, TransportFailure> {
        fs::create_dir_all(&self.dir)?;
        let path = self.next_path();
        fs::write(&path, body)?;

        let answer = serde_json::json!({
            "message": format!("Metrics saved to {}", path.display()),
        });
        Ok(TransportResponse {
            status: 201,
            body: answer.to_string(),
        })
    }
}
