//! JSON POST to the metrics ingest endpoint

use super::{Transport, TransportFailure, TransportResponse};
use std::time::Duration;

/// Posts metrics records to an HTTP endpoint
#[derive(Clone)]
pub struct HttpTransport {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    /// `timeout` bounds the whole request, connect included
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn describe(&self) -> String {
        self.endpoint.clone()
    }

    fn post(&self, body: &str) -> Result<TransportResponse, TransportFailure> {
        let result = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_string(body);

        // ureq reports 4xx/5xx as errors; they are answers, not transport faults
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(e)) => {
                return Err(TransportFailure::Network(e.to_string()));
            }
        };

        let status = response.status();
        let body = response.into_string()?;
        Ok(TransportResponse { status, body })
    }
}
