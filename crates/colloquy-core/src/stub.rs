//! Stub text generators.
//!
//! These stand in for a hosted model where determinism matters: tests,
//! offline demos, and smoke runs of the transport layer.

use colloquy_agents::{GenerationError, TextGenerator};
use colloquy_types::ChatMessage;

/// Replies with the content of the last message it was sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoGenerator;

impl TextGenerator for EchoGenerator {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        Ok(messages
            .last()
            .map(|message| message.content.clone())
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Fails every call with a request error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    async fn generate(&self, _messages: &[ChatMessage]) -> Result<String, GenerationError> {
        Err(GenerationError::Request(String::from(
            "stub backend is unavailable",
        )))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
