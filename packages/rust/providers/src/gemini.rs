//! Gemini generation client (primary provider).
//!
//! Thin wrapper over the `generateContent` REST endpoint. The client is
//! constructed even when no API key is present; in that degraded state every
//! call returns an immediate provider error without network I/O.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use coursegen_shared::{CourseGenError, Result};

use crate::{Provider, TextGenerator};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// HTTP timeout for generation calls. Long-form content can take a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the Gemini `generateContent` API.
pub struct GeminiClient {
    api_key: Option<String>,
    http: reqwest::Client,
    base_url: String,
    model: String,
    throttle: Duration,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String, throttle: Duration) -> Result<Self> {
        Self::with_base_url(api_key, model, throttle, GEMINI_API_BASE.to_string())
    }

    /// Construct against a custom base URL (used by tests against a mock server).
    pub fn with_base_url(
        api_key: Option<String>,
        model: String,
        throttle: Duration,
        base_url: String,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("CourseGen/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CourseGenError::provider(format!("Gemini client build: {e}")))?;

        Ok(Self {
            api_key,
            http,
            base_url,
            model,
            throttle,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(CourseGenError::provider(
                "Gemini client is not initialized: API key env var not set",
            ));
        };

        // Throttling placeholder, a policy knob rather than a correctness need.
        if !self.throttle.is_zero() {
            tokio::time::sleep(self.throttle).await;
        }

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        debug!(model = %self.model, prompt_len = prompt.len(), "gemini generate");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CourseGenError::provider(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CourseGenError::provider(format!(
                "Gemini HTTP {status}: {}",
                detail.trim()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CourseGenError::provider(format!("Gemini response parse: {e}")))?;

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(CourseGenError::provider(
                "Gemini returned no usable response text",
            ));
        }

        Ok(text.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    /// Concatenate all text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}
