//! Configuration loading and typed config structures.
//!
//! The configuration lives in `colloquy-config.yaml`. This module defines
//! strongly-typed structs mirroring the YAML structure. Every field has a
//! default, so a missing file or a partial file is fine.
//!
//! The API key for the text-generation service is never read from YAML;
//! it comes from the `LLM_API_KEY` environment variable.

use std::path::{Path, PathBuf};

use colloquy_agents::AgentSettings;
use colloquy_agents::config::{DEFAULT_KNOWLEDGE_EXTENSIONS, DEFAULT_TOP_K};
use serde::Deserialize;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "colloquy-config.yaml";

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "COLLOQUY_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ColloquyConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Text-generation backend settings.
    #[serde(default)]
    pub llm: LlmSection,

    /// Knowledge loading and retrieval settings.
    #[serde(default)]
    pub knowledge: KnowledgeSection,

    /// Simulation limits and prompt templates.
    #[serde(default)]
    pub simulation: SimulationSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl ColloquyConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the backend:
    /// - `LLM_BACKEND` overrides `llm.backend`
    /// - `LLM_API_URL` overrides `llm.api_url`
    /// - `LLM_MODEL` overrides `llm.model`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.llm.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from `COLLOQUY_CONFIG` or `colloquy-config.yaml`, falling back
    /// to defaults when the file does not exist.
    ///
    /// Returns the config and the path it was read from, if any.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        if path.exists() {
            let config = Self::from_file(&path)?;
            Ok((config, Some(path)))
        } else {
            let mut config = Self::default();
            config.llm.apply_env_overrides();
            Ok((config, None))
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.max_turns == 0 {
            return Err(ConfigError::Invalid(String::from(
                "simulation.max_turns must be at least 1",
            )));
        }
        if self.simulation.default_turns == 0
            || self.simulation.default_turns > self.simulation.max_turns
        {
            return Err(ConfigError::Invalid(format!(
                "simulation.default_turns must be between 1 and {}",
                self.simulation.max_turns
            )));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature {} is outside 0.0..=2.0",
                self.llm.temperature
            )));
        }
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// Text-generation backend settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmSection {
    /// Backend type: `openai` (also `dashscope`, `deepseek`, `ollama`) or
    /// `anthropic`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Base API URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Optional cap on generated tokens.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Per-call deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl LlmSection {
    /// Apply `LLM_BACKEND`, `LLM_API_URL`, and `LLM_MODEL` overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LLM_BACKEND") {
            self.backend = val;
        }
        if let Ok(val) = std::env::var("LLM_API_URL") {
            self.api_url = val;
        }
        if let Ok(val) = std::env::var("LLM_MODEL") {
            self.model = val;
        }
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Knowledge loading and retrieval settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnowledgeSection {
    /// File extensions read from knowledge directories.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Documents retrieved per agent turn.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl KnowledgeSection {
    /// Settings handed to every agent built for a run.
    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            extensions: self.extensions.clone(),
            top_k: self.top_k,
        }
    }
}

impl Default for KnowledgeSection {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            top_k: default_top_k(),
        }
    }
}

/// Simulation limits and prompt templates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationSection {
    /// Rounds used when a request does not specify any.
    #[serde(default = "default_turns")]
    pub default_turns: u32,

    /// Upper bound on requested rounds.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Directory holding `system.j2` and `request.j2` overrides.
    #[serde(default)]
    pub templates_dir: Option<String>,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            default_turns: default_turns(),
            max_turns: default_max_turns(),
            templates_dir: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> String {
    "static".to_owned()
}

fn default_backend() -> String {
    "openai".to_owned()
}

fn default_api_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_owned()
}

fn default_model() -> String {
    "qwen-plus".to_owned()
}

const fn default_temperature() -> f64 {
    0.3
}

const fn default_timeout_ms() -> u64 {
    60_000
}

fn default_extensions() -> Vec<String> {
    DEFAULT_KNOWLEDGE_EXTENSIONS
        .iter()
        .map(|ext| (*ext).to_owned())
        .collect()
}

const fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

const fn default_turns() -> u32 {
    3
}

const fn default_max_turns() -> u32 {
    20
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_format() -> String {
    "pretty".to_owned()
}
