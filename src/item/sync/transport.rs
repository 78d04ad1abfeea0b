use std::time::Duration;

use log::debug;
use reqwest::{blocking::Client, header::CONTENT_TYPE};

use crate::error::BatchError;

/// Status line and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one JSON request and hands back the raw response.
///
/// Only failures to complete the exchange are errors; any status code the
/// server answers with is returned as a `TransportResponse`.
pub trait Transport {
    fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: String,
    ) -> Result<TransportResponse, BatchError>;
}

/// Blocking HTTP transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the client. `None` waits for the server indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, BatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| BatchError::Configuration(error.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: String,
    ) -> Result<TransportResponse, BatchError> {
        debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .client
            .post(url)
            .bearer_auth(bearer_token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|error| BatchError::ItemWriter(format!("request failed: {error}")))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|error| {
            BatchError::ItemWriter(format!("cannot read response body: {error}"))
        })?;

        Ok(TransportResponse { status, body })
    }
}
