//! Gemini `generateContent` client
//!
//! Single-turn: every call carries one user prompt and no history.

use crate::{Error, Result, TextGenerator, API_KEY_ENV};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-001";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create client with specific API key. A blank key is rejected.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create client from `GOOGLE_API_KEY`
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_ENV).map_err(|_| Error::MissingApiKey)?;
        Self::new(key)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
            timeout,
        })
    }

    /// Set model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set API base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Request(err.to_string())
        }
    }
}

/// Concatenate the text parts of the first candidate
pub fn parse_response(body: &str) -> Result<String> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| Error::Decode(e.to_string()))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::EmptyResponse);
    }
    Ok(text)
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(err) => err.error.message,
        Err(_) => body.chars().take(200).collect(),
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Requesting generation");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            let message = error_message(&body);
            tracing::warn!(model = %self.model, status = status.as_u16(), %message, "Gemini rejected request");
            return Err(Error::Status {
                code: status.as_u16(),
                message,
            });
        }

        let text = parse_response(&body)?;
        tracing::info!(model = %self.model, response_chars = text.len(), "Generated answer");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned HTTP response after reading the full request.
    async fn serve_once(response: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                if request_complete(&received) {
                    break;
                }
            }
            let _ = tx.send(String::from_utf8_lossy(&received).to_string());
            if response.is_empty() {
                tokio::time::sleep(Duration::from_secs(5)).await;
            } else {
                socket.write_all(response.as_bytes()).await.unwrap();
            }
        });

        (format!("http://{addr}"), rx)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..head_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= head_end + 4 + length
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn test_blank_key_rejected() {
        assert!(matches!(GeminiClient::new("  "), Err(Error::MissingApiKey)));
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new("k").unwrap().base_url("http://localhost:9/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9/v1beta/models/gemini-1.5-flash-001:generateContent"
        );
        let client = client.model("gemini-pro");
        assert!(client.endpoint().ends_with("/models/gemini-pro:generateContent"));
    }

    #[test]
    fn test_debug_hides_key() {
        let client = GeminiClient::new("secret-key").unwrap();
        assert!(!format!("{client:?}").contains("secret-key"));
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Brakes "},{"text":"lead."}],"role":"model"}},
            {"content":{"parts":[{"text":"ignored"}]}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "Brakes lead.");
    }

    #[test]
    fn test_parse_response_without_text() {
        assert!(matches!(parse_response(r#"{"candidates":[]}"#), Err(Error::EmptyResponse)));
        assert!(matches!(
            parse_response(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(Error::EmptyResponse)
        ));
        assert!(matches!(parse_response("oops"), Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn test_generate_success() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Two recalls."}]}}]}"#;
        let (base, request) = serve_once(http_response("200 OK", body)).await;
        let client = GeminiClient::new("test-key").unwrap().base_url(base);

        let answer = client.generate("How many recalls?").await.unwrap();
        assert_eq!(answer, "Two recalls.");

        let raw = request.await.unwrap();
        assert!(raw.starts_with("POST /v1beta/models/gemini-1.5-flash-001:generateContent HTTP/1.1"));
        assert!(raw.to_lowercase().contains("x-goog-api-key: test-key"));
        assert!(raw.contains(r#"{"contents":[{"parts":[{"text":"How many recalls?"}]}]}"#));
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let (base, _request) = serve_once(http_response("400 Bad Request", body)).await;
        let client = GeminiClient::new("bad").unwrap().base_url(base);

        match client.generate("hi").await {
            Err(Error::Status { code, message }) => {
                assert_eq!(code, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("Expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_timeout() {
        let (base, _request) = serve_once(String::new()).await;
        let client = GeminiClient::with_timeout("k", Duration::from_millis(200))
            .unwrap()
            .base_url(base);

        assert!(matches!(client.generate("hi").await, Err(Error::Timeout(_))));
    }
}
