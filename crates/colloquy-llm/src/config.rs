//! Backend configuration.
//!
//! Everything except the API key comes from the `llm` section of the YAML
//! config. The key is read from `LLM_API_KEY` so it never lands in a file.

use std::time::Duration;

use colloquy_core::config::LlmSection;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "LLM_API_KEY";

/// Errors in backend configuration.
#[derive(Debug, thiserror::Error)]
pub enum LlmConfigError {
    /// The backend name is not recognized.
    #[error("unknown backend type: {0}")]
    UnknownBackend(String),
}

/// Supported backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible API (`OpenAI`, `DashScope`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API (different request format).
    Anthropic,
}

impl BackendType {
    /// Parse a backend name, case-insensitively.
    pub fn parse(name: &str) -> Result<Self, LlmConfigError> {
        match name.trim().to_lowercase().as_str() {
            "openai" | "dashscope" | "qwen" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(LlmConfigError::UnknownBackend(other.to_owned())),
        }
    }
}

/// Configuration for a single backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// The backend type.
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key. Requests go out without credentials when absent.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Optional cap on generated tokens.
    pub max_tokens: Option<u32>,
    /// Per-call deadline.
    pub timeout: Duration,
}

impl LlmBackendConfig {
    /// Build from the YAML section and the `LLM_API_KEY` variable.
    pub fn from_section(section: &LlmSection) -> Result<Self, LlmConfigError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self::with_key(section, api_key)
    }

    /// Build from the YAML section with an explicit key.
    pub fn with_key(section: &LlmSection, api_key: Option<String>) -> Result<Self, LlmConfigError> {
        Ok(Self {
            backend_type: BackendType::parse(&section.backend)?,
            api_url: section.api_url.trim_end_matches('/').to_owned(),
            api_key,
            model: section.model.clone(),
            temperature: section.temperature,
            max_tokens: section.max_tokens,
            timeout: Duration::from_millis(section.timeout_ms),
        })
    }
}
