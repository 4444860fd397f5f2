//! # Recall Data Fetcher
//!
//! Looks up recalls for one vehicle against the NHTSA `recallsByVehicle` API.
//!
//! Every failure comes back as a typed [`Error`]; callers never receive an
//! empty stand-in for a failed lookup.
//!
//! ## Usage
//!
//! ```ignore
//! use recall_fetch::{NhtsaFetcher, RecallSource};
//!
//! let fetcher = NhtsaFetcher::new()?;
//! let table = fetcher.fetch_table(&vehicle).await?;
//! ```

pub mod fetcher;
pub mod fixture;

pub use fetcher::{NhtsaFetcher, RecallResponse, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use fixture::StaticSource;

use async_trait::async_trait;
use recall_core::{RecallTable, VehicleIdentification};
use std::time::Duration;

/// Name used when reporting failures of this collaborator
pub const SERVICE_NAME: &str = "NHTSA recall API";

/// Result type for fetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the recall lookup
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("NHTSA recall API timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("NHTSA recall API request failed: {0}")]
    Request(String),

    #[error("NHTSA recall API returned HTTP {0}")]
    Status(u16),

    #[error("NHTSA recall API returned an unexpected body: {0}")]
    Decode(String),

    #[error("Invalid recall API endpoint: {0}")]
    Endpoint(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("Recall fixture unreadable: {0}")]
    Fixture(String),
}

/// Anything that can produce recall data for a vehicle
#[async_trait]
pub trait RecallSource: Send + Sync {
    /// Source identifier for logs
    fn name(&self) -> &str;

    /// Retrieve the raw recall response
    async fn fetch(&self, vehicle: &VehicleIdentification) -> Result<RecallResponse>;

    /// Retrieve and project into a [`RecallTable`]
    async fn fetch_table(&self, vehicle: &VehicleIdentification) -> Result<RecallTable> {
        let response = self.fetch(vehicle).await?;
        Ok(response.table())
    }
}
