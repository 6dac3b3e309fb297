//! Google Gemini `generateContent` client.
//!
//! See: <https://ai.google.dev/api/generate-content>
//!
//! One [`GeminiClient`] (HTTP connection pool + API key) is shared by every
//! model in the fallback hierarchy; [`GeminiModel`] binds it to a model id
//! and implements [`GenerateProvider`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::GenerateProvider;
use crate::{FutplotError, Result};

/// Default base URL for the Gemini API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default HTTP timeout. Per-attempt bounds are applied by the invoker;
/// this only guards against a connection that never completes.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest error body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Client for the Gemini generative language API.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<Inner>,
}

struct Inner {
    api_key: String,
    http: Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FutplotError::Configuration(
                "Gemini API key not configured".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| FutplotError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                api_key,
                http,
                base_url: base_url.into().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Bind this client to a model id, producing a fallback-chain endpoint.
    pub fn model(&self, model: impl Into<String>) -> GeminiModel {
        GeminiModel {
            client: self.clone(),
            model: model.into(),
        }
    }

    /// Generate content with `model` and return the first candidate's text.
    ///
    /// # Arguments
    /// * `prompt` - Full natural-language prompt
    /// * `model` - Gemini model id (e.g. `gemini-2.5-flash-lite`)
    pub async fn generate_content(&self, prompt: &str, model: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.inner.base_url, model
        );

        let response = self
            .inner
            .http
            .post(&url)
            .header("x-goog-api-key", &self.inner.api_key)
            .json(&GenerateContentRequest {
                contents: vec![Content {
                    parts: vec![Part { text: prompt }],
                }],
            })
            .send()
            .await
            .map_err(|e| FutplotError::Http(e.to_string()))?;

        let response = Self::handle_response_errors(response).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FutplotError::Http(format!("unreadable response envelope: {e}")))?;

        body.first_text().ok_or(FutplotError::EmptyResponse)
    }

    /// Check response status and map to appropriate error.
    async fn handle_response_errors(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            401 | 403 => Err(FutplotError::AuthenticationFailed),
            429 => {
                // Try to parse retry-after header
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(FutplotError::RateLimited { retry_after })
            }
            code => {
                let mut message = response.text().await.unwrap_or_default();
                if message.len() > MAX_ERROR_BODY {
                    let mut cut = MAX_ERROR_BODY;
                    while !message.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    message.truncate(cut);
                }
                Err(FutplotError::Api {
                    status: code,
                    message,
                })
            }
        }
    }
}

/// A Gemini model endpoint: shared client + model id.
#[derive(Clone)]
pub struct GeminiModel {
    client: GeminiClient,
    model: String,
}

#[async_trait]
impl GenerateProvider for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client.generate_content(prompt, &self.model).await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present and not blank.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<String> {
        serde_json::from_str::<GenerateContentResponse>(json)
            .unwrap()
            .first_text()
    }

    #[test]
    fn extracts_first_candidate_text() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"hello"},{"text":"ignored"}]}}]}"#;
        assert_eq!(parse(json), Some("hello".to_string()));
    }

    #[test]
    fn missing_candidates_is_none() {
        assert_eq!(parse(r#"{}"#), None);
        assert_eq!(parse(r#"{"candidates":[]}"#), None);
    }

    #[test]
    fn blocked_candidate_without_content_is_none() {
        assert_eq!(parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#), None);
    }

    #[test]
    fn blank_text_is_none() {
        assert_eq!(parse(r#"{"candidates":[{"content":{"parts":[{"text":"  \n"}]}}]}"#), None);
    }

    #[test]
    fn empty_api_key_is_configuration_error() {
        let err = GeminiClient::new("  ").err().unwrap();
        assert!(matches!(err, FutplotError::Configuration(_)));
    }

    #[test]
    fn model_endpoint_named_by_model_id() {
        let client = GeminiClient::new("key").unwrap();
        let model = client.model("gemini-2.5-flash-lite");
        assert_eq!(model.name(), "gemini-2.5-flash-lite");
    }
}
