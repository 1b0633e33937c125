//! Generation backend adapters for CourseGen.
//!
//! Two interchangeable providers sit behind the [`TextGenerator`] trait:
//! Gemini (primary) and Groq (secondary). Both normalize every failure —
//! missing key, transport, HTTP status, response parsing, empty output —
//! into a `CourseGenError::Provider` value; no transport error ever escapes
//! the adapter boundary as anything else.
//!
//! [`ProviderSet`] holds both backends and is constructed once at process
//! start from config + environment, then passed by reference into the
//! pipeline. Tests inject stub generators through [`ProviderSet::new`].

mod gemini;
mod groq;

use std::time::Duration;

use async_trait::async_trait;

use coursegen_shared::{AppConfig, Result, read_api_key};

pub use gemini::GeminiClient;
pub use groq::GroqClient;

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// A named generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Provider {
    Gemini,
    Groq,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::Groq => "Groq",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TextGenerator trait
// ---------------------------------------------------------------------------

/// Uniform contract for a text-generation backend.
///
/// `generate` is the single suspension point of the pipeline: it either
/// returns non-empty generated text or a provider error. Implementations
/// must not panic on transport failures.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Which provider this backend represents (used for error placeholders).
    fn provider(&self) -> Provider;

    /// Run one generation call to completion.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// ProviderSet
// ---------------------------------------------------------------------------

/// The process-wide pair of generation backends.
///
/// Backends are stateless from the pipeline's perspective; each call is
/// independent, so a shared reference is all the pipeline needs.
pub struct ProviderSet {
    gemini: Box<dyn TextGenerator>,
    groq: Box<dyn TextGenerator>,
}

impl ProviderSet {
    /// Build a set from explicit backends (stubs in tests, real clients in prod).
    pub fn new(gemini: Box<dyn TextGenerator>, groq: Box<dyn TextGenerator>) -> Self {
        Self { gemini, groq }
    }

    /// Construct both real clients from config, reading API keys from the
    /// env vars the config names. A missing key does not fail startup; it
    /// degrades that provider to immediate failure on every call.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let throttle = Duration::from_millis(config.defaults.throttle_ms);

        let gemini_key = read_api_key(&config.gemini.api_key_env);
        let groq_key = read_api_key(&config.groq.api_key_env);

        let gemini = GeminiClient::new(gemini_key, config.gemini.model.clone(), throttle)?;
        let groq = GroqClient::new(groq_key, config.groq.model.clone(), throttle)?;

        Ok(Self::new(Box::new(gemini), Box::new(groq)))
    }

    /// Look up the backend for a provider tag.
    pub fn backend(&self, provider: Provider) -> &dyn TextGenerator {
        match provider {
            Provider::Gemini => self.gemini.as_ref(),
            Provider::Groq => self.groq.as_ref(),
        }
    }
}
