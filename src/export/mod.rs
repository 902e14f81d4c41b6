//! Metrics submission to an external ingestion boundary
//!
//! The [`Exporter`] serializes a [`MetricsResult`] and hands it to a
//! [`Transport`]. It submits once: there is no retry, no queue and no memory
//! of earlier submissions. Any failure comes back as a [`TransportFailure`]
//! and the caller decides whether to try again.

mod file;
mod http;

pub use file::FileTransport;
pub use http::HttpTransport;

use crate::config::{ExportConfig, TransportKind};
use crate::metrics::MetricsResult;
use std::fmt;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Why a submission did not reach the ingest endpoint
#[derive(Debug, Error)]
pub enum TransportFailure {
    #[error("failed to serialize metrics: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("ingest endpoint answered {status}")]
    Rejected { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Raw answer from the ingestion boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Delivers one serialized metrics record.
///
/// Implementations report what the boundary answered; classifying the
/// answer is the exporter's job.
pub trait Transport: Send + Sync {
    /// Short description for logs and status lines
    fn describe(&self) -> String;

    /// Deliver `body`, a JSON object
    fn post(&self, body: &str) -> Result<TransportResponse, TransportFailure>;
}

/// Successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Status code of the accepting response
    pub status: u16,
    /// `message` field of the JSON response body, if any
    pub message: Option<String>,
}

impl Ack {
    fn from_response(response: &TransportResponse) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&response.body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(str::to_string));
        Self {
            status: response.status,
            message,
        }
    }
}

/// Submits metrics through a transport
#[derive(Clone)]
pub struct Exporter {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter")
            .field("transport", &self.transport.describe())
            .finish()
    }
}

impl Exporter {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Exporter for the transport selected in the configuration
    pub fn from_config(config: &ExportConfig) -> Self {
        match config.transport {
            TransportKind::Http => Self::new(HttpTransport::new(
                config.endpoint.clone(),
                config.timeout(),
            )),
            TransportKind::File => Self::new(FileTransport::new(config.outbox_dir())),
        }
    }

    /// Where submissions go
    pub fn destination(&self) -> String {
        self.transport.describe()
    }

    /// Submit one metrics record
    pub fn submit(&self, metrics: &MetricsResult) -> Result<Ack, TransportFailure> {
        let body = serde_json::to_string(metrics)?;
        log::info!("submitting metrics to {}", self.transport.describe());

        let response = self.transport.post(&body).inspect_err(|e| {
            log::warn!("metrics submission failed: {}", e);
        })?;

        if !response.is_success() {
            log::warn!("metrics rejected with status {}", response.status);
            return Err(TransportFailure::Rejected {
                status: response.status,
                body: response.body,
            });
        }

        let ack = Ack::from_response(&response);
        log::info!("metrics accepted with status {}", ack.status);
        Ok(ack)
    }
}
