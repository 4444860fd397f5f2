//! Server configuration from command-line flags and environment variables

use clap::Parser;
use recall_fetch::{NhtsaFetcher, RecallSource, StaticSource};
use recall_gemini::{GeminiClient, TextGenerator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "recall-web")]
#[command(about = "Vehicle recall charts and chatbot server")]
#[command(version)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "RECALL_WEB_BIND", default_value = "127.0.0.1:5000")]
    pub bind: String,

    /// File holding the selected vehicle
    #[arg(long, env = "RECALL_DATA_FILE", default_value = "vehicle_data.json")]
    pub data_file: PathBuf,

    /// NHTSA recallsByVehicle endpoint
    #[arg(long, env = "RECALL_API_URL", default_value = recall_fetch::DEFAULT_ENDPOINT)]
    pub recall_api_url: String,

    /// Recall lookup timeout in seconds
    #[arg(long, env = "RECALL_API_TIMEOUT_SECS", default_value_t = 10)]
    pub recall_api_timeout_secs: u64,

    /// Serve recalls from a saved API response instead of the live API
    #[arg(long, env = "RECALL_FIXTURE")]
    pub fixture: Option<PathBuf>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = recall_gemini::DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_API_URL", default_value = recall_gemini::DEFAULT_BASE_URL)]
    pub gemini_api_url: String,

    /// Gemini request timeout in seconds
    #[arg(long, env = "GEMINI_TIMEOUT_SECS", default_value_t = 60)]
    pub gemini_timeout_secs: u64,

    /// Gemini API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Print the route table and exit
    #[arg(long)]
    pub print_routes: bool,
}

impl Config {
    /// Live NHTSA fetcher, or the fixture when one is configured
    pub fn recall_source(&self) -> anyhow::Result<Arc<dyn RecallSource>> {
        if let Some(path) = &self.fixture {
            tracing::warn!(path = %path.display(), "Serving recalls from fixture");
            return Ok(Arc::new(StaticSource::from_file(path)?));
        }

        let fetcher = NhtsaFetcher::with_timeout(Duration::from_secs(self.recall_api_timeout_secs))?
            .endpoint(self.recall_api_url.clone());
        Ok(Arc::new(fetcher))
    }

    /// Gemini client. Fails when no API key is configured.
    pub fn text_generator(&self) -> anyhow::Result<Arc<dyn TextGenerator>> {
        let key = self
            .google_api_key
            .clone()
            .ok_or(recall_gemini::Error::MissingApiKey)?;
        let client = GeminiClient::with_timeout(key, Duration::from_secs(self.gemini_timeout_secs))?
            .model(self.gemini_model.clone())
            .base_url(self.gemini_api_url.clone());
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["recall-web", "--google-api-key", "k"]).unwrap();

        assert_eq!(config.bind, "127.0.0.1:5000");
        assert_eq!(config.data_file, PathBuf::from("vehicle_data.json"));
        assert_eq!(config.recall_api_url, recall_fetch::DEFAULT_ENDPOINT);
        assert_eq!(config.recall_api_timeout_secs, 10);
        assert_eq!(config.gemini_model, "gemini-1.5-flash-001");
        assert_eq!(config.gemini_timeout_secs, 60);
        assert!(config.text_generator().is_ok());
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let config = Config::try_parse_from(["recall-web", "--google-api-key", " "]).unwrap();
        assert!(config.text_generator().is_err());
    }

    #[test]
    fn test_fixture_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recalls.json");
        std::fs::write(&path, r#"{"Count":0,"results":[]}"#).unwrap();

        let config = Config::try_parse_from([
            "recall-web",
            "--fixture",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(config.recall_source().unwrap().name(), "fixture");
    }
}
