//! NHTSA recall fetcher
//!
//! One GET per call: no retries, no response cache. The HTTP client carries
//! a bounded timeout and a timeout is reported as its own error kind.

use crate::{Error, RecallSource, Result};
use async_trait::async_trait;
use recall_core::{RecallTable, VehicleIdentification};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Default lookup endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.nhtsa.gov/recalls/recallsByVehicle";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Body returned by `recallsByVehicle`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecallResponse {
    #[serde(rename = "Count", default)]
    pub count: Option<u64>,

    #[serde(rename = "Message", default)]
    pub message: Option<String>,

    /// One JSON object per recall notice, API order
    pub results: Vec<Value>,
}

impl RecallResponse {
    /// Parse a raw response body. A body without a `results` array is rejected.
    pub fn from_body(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::Decode(e.to_string()))
    }

    pub fn table(&self) -> RecallTable {
        RecallTable::from_results(&self.results)
    }
}

/// HTTP fetcher for the NHTSA recall API
#[derive(Debug, Clone)]
pub struct NhtsaFetcher {
    /// API endpoint
    endpoint: String,
    /// HTTP client
    client: reqwest::Client,
    /// Request timeout, kept for error reporting
    timeout: Duration,
}

impl NhtsaFetcher {
    /// Create fetcher with default endpoint and timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("recall-lens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client,
            timeout,
        })
    }

    /// Set custom endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the lookup URL with URL-encoded `make`, `model` and `modelYear`
    pub fn request_url(&self, vehicle: &VehicleIdentification) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse_with_params(
            &self.endpoint,
            &[
                ("make", vehicle.make.as_str()),
                ("model", vehicle.model.as_str()),
                ("modelYear", vehicle.model_year.as_str()),
            ],
        )
        .map_err(|e| Error::Endpoint(format!("{}: {e}", self.endpoint)))?;

        // Spaces go out as %20. A literal '+' is already escaped to %2B.
        if let Some(query) = url.query().map(|q| q.replace('+', "%20")) {
            url.set_query(Some(&query));
        }
        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Request(err.to_string())
        }
    }
}

#[async_trait]
impl RecallSource for NhtsaFetcher {
    fn name(&self) -> &str {
        "nhtsa"
    }

    async fn fetch(&self, vehicle: &VehicleIdentification) -> Result<RecallResponse> {
        let url = self.request_url(vehicle)?;
        tracing::debug!(%url, "Requesting recall data");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(vehicle = %vehicle, status = status.as_u16(), "Recall API rejected lookup");
            return Err(Error::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let parsed = RecallResponse::from_body(&body)?;

        tracing::info!(vehicle = %vehicle, records = parsed.results.len(), "Fetched recall data");
        Ok(parsed)
    }
}
