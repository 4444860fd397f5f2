//! Offline recall source backed by a saved API response.
//!
//! Useful for demos without network access and for exercising the chart and
//! chatbot paths in tests. The vehicle argument is ignored.

use crate::{Error, RecallResponse, RecallSource, Result};
use async_trait::async_trait;
use recall_core::VehicleIdentification;
use serde_json::Value;
use std::path::Path;

/// Recall source that always answers with the same response
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    response: RecallResponse,
}

impl StaticSource {
    pub fn new(response: RecallResponse) -> Self {
        Self { response }
    }

    /// Build from bare recall entries
    pub fn from_results(results: Vec<Value>) -> Self {
        Self::new(RecallResponse {
            count: Some(results.len() as u64),
            message: None,
            results,
        })
    }

    /// Load a response previously saved from the live API
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path)
            .map_err(|e| Error::Fixture(format!("{}: {e}", path.display())))?;
        let response = RecallResponse::from_body(&body)
            .map_err(|e| Error::Fixture(format!("{}: {e}", path.display())))?;
        Ok(Self::new(response))
    }
}

#[async_trait]
impl RecallSource for StaticSource {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn fetch(&self, _vehicle: &VehicleIdentification) -> Result<RecallResponse> {
        Ok(self.response.clone())
    }
}
