//! # Recall Gemini
//!
//! Question answering over recall data. The whole recall table is inlined
//! into a single prompt and sent to a Gemini model; the reply is passed
//! through as-is.

pub mod client;
pub mod prompt;

pub use client::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
pub use prompt::build_prompt;

use async_trait::async_trait;
use std::time::Duration;

/// Name used when reporting failures of this collaborator
pub const SERVICE_NAME: &str = "Gemini";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Result type for text generation
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the text generation service
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("GOOGLE_API_KEY not set. Export your Gemini API key.")]
    MissingApiKey,

    #[error("Gemini timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Gemini request failed: {0}")]
    Request(String),

    #[error("Gemini returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Gemini returned no text")]
    EmptyResponse,

    #[error("Gemini returned an unexpected body: {0}")]
    Decode(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Anything that turns a prompt into generated text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generator identifier for logs
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String>;
}
