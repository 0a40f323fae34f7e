//! Hosted text-generation backends for the Colloquy negotiation simulator.
//!
//! Implements [`TextGenerator`] over HTTP for `OpenAI`-compatible chat
//! completion APIs and the Anthropic Messages API.
//!
//! [`TextGenerator`]: colloquy_agents::TextGenerator

pub mod config;
pub mod llm;

pub use config::{BackendType, LlmBackendConfig, LlmConfigError};
pub use llm::{AnthropicBackend, LlmBackend, OpenAiBackend, create_backend};
