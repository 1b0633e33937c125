//! Groq generation client (secondary provider).
//!
//! Uses Groq's OpenAI-compatible chat-completions endpoint with a single
//! user message per request. Same degraded-mode contract as the Gemini
//! client: no API key means immediate failure without network I/O.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use coursegen_shared::{CourseGenError, Result};

use crate::{Provider, TextGenerator};

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the Groq chat-completions API.
pub struct GroqClient {
    api_key: Option<String>,
    http: reqwest::Client,
    base_url: String,
    model: String,
    throttle: Duration,
}

impl GroqClient {
    pub fn new(api_key: Option<String>, model: String, throttle: Duration) -> Result<Self> {
        Self::with_base_url(api_key, model, throttle, GROQ_API_BASE.to_string())
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
            .map_err(|e| CourseGenError::provider(format!("Groq client build: {e}")))?;

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
impl TextGenerator for GroqClient {
    fn provider(&self) -> Provider {
        Provider::Groq
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(CourseGenError::provider(
                "Groq client is not initialized: API key env var not set",
            ));
        };

        if !self.throttle.is_zero() {
            tokio::time::sleep(self.throttle).await;
        }

        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        debug!(model = %self.model, prompt_len = prompt.len(), "groq generate");

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CourseGenError::provider(format!("Groq request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CourseGenError::provider(format!(
                "Groq HTTP {status}: {}",
                detail.trim()
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CourseGenError::provider(format!("Groq response parse: {e}")))?;

        let text = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(CourseGenError::provider(
                "Groq returned no usable response text",
            ));
        }

        Ok(text.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}
