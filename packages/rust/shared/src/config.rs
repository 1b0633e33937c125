//! Application configuration for CourseGen.
//!
//! User config lives at `~/.coursegen/coursegen.toml`.
//! CLI flags override config file values, which override defaults.
//! API keys are never stored in the file; the config names the env vars
//! that hold them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CourseGenError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "coursegen.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".coursegen";

// ---------------------------------------------------------------------------
// Config structs (matching coursegen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Primary provider (Gemini) settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Secondary provider (Groq) settings.
    #[serde(default)]
    pub groq: GroqConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default artifact output directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Default semester length in weeks.
    #[serde(default = "default_semester_weeks")]
    pub semester_weeks: u32,

    /// Default media preferences for reading-material generation.
    #[serde(default = "default_media_preferences")]
    pub media_preferences: Vec<String>,

    /// Fixed delay in ms before each backend call (throttling placeholder).
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            semester_weeks: default_semester_weeks(),
            media_preferences: default_media_preferences(),
            throttle_ms: default_throttle_ms(),
        }
    }
}

fn default_output_dir() -> String {
    "~/coursegen-artifacts".into()
}
fn default_semester_weeks() -> u32 {
    15
}
fn default_media_preferences() -> Vec<String> {
    vec!["Text".into(), "Books".into(), "Articles".into()]
}
fn default_throttle_ms() -> u64 {
    1000
}

/// `[gemini]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_gemini_key_env")]
    pub api_key_env: String,

    /// Model ID for generation requests.
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_gemini_key_env(),
            model: default_gemini_model(),
        }
    }
}

fn default_gemini_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_gemini_model() -> String {
    "gemini-2.5-pro".into()
}

/// `[groq]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_groq_key_env")]
    pub api_key_env: String,

    /// Model ID for generation requests.
    #[serde(default = "default_groq_model")]
    pub model: String,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_groq_key_env(),
            model: default_groq_model(),
        }
    }
}

fn default_groq_key_env() -> String {
    "GROQ_API_KEY".into()
}
fn default_groq_model() -> String {
    "llama-3.1-8b-instant".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.coursegen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CourseGenError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.coursegen/coursegen.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CourseGenError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CourseGenError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CourseGenError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CourseGenError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CourseGenError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read a provider API key from the env var named in config.
///
/// Returns `None` when the var is unset or empty; a missing key is non-fatal
/// and degrades the affected provider to permanent immediate failure.
pub fn read_api_key(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        _ => {
            tracing::warn!(var = var_name, "API key env var not set; provider degraded");
            None
        }
    }
}

/// Expand a leading `~/` in a configured path using the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("GEMINI_API_KEY"));
        assert!(toml_str.contains("GROQ_API_KEY"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.semester_weeks, 15);
        assert_eq!(parsed.gemini.model, "gemini-2.5-pro");
        assert_eq!(parsed.groq.api_key_env, "GROQ_API_KEY");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[gemini]
model = "gemini-2.0-flash"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.defaults.throttle_ms, 1000);
        assert_eq!(
            config.defaults.media_preferences,
            vec!["Text", "Books", "Articles"]
        );
    }

    #[test]
    fn missing_api_key_is_none() {
        // Use a unique env var name to avoid interfering with other tests
        assert!(read_api_key("COURSEGEN_TEST_NONEXISTENT_KEY_12345").is_none());
    }

    #[test]
    fn expand_home_passthrough_for_absolute() {
        assert_eq!(expand_home("/tmp/x"), PathBuf::from("/tmp/x"));
    }
}
