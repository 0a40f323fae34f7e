//! Text-generation backends and their dispatch.
//!
//! Enum dispatch instead of trait objects: [`TextGenerator`] has an async
//! method, so it is not dyn-compatible. Both backends speak HTTP via
//! `reqwest` and share the same deadline and error mapping.

use std::time::Duration;

use colloquy_agents::{GenerationError, TextGenerator};
use colloquy_types::{ChatMessage, ChatRole};
use tracing::debug;

use crate::config::{BackendType, LlmBackendConfig};

/// Anthropic requires `max_tokens`; used when the config leaves it unset.
const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Leading user turn inserted when an Anthropic conversation would
/// otherwise open with an assistant message.
const ANTHROPIC_HISTORY_PREAMBLE: &str = "Your earlier statements in this negotiation follow.";

/// A hosted text-generation backend.
pub enum LlmBackend {
    /// `OpenAI`-compatible chat completions API.
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
}

impl TextGenerator for LlmBackend {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        match self {
            Self::OpenAi(backend) => backend.complete(messages).await,
            Self::Anthropic(backend) => backend.complete(messages).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }
}

/// Backend for `OpenAI`-compatible chat completions APIs.
///
/// Works with `OpenAI`, `DashScope` compatible mode, `DeepSeek`, and Ollama.
/// Sends requests to `{api_url}/chat/completions`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f64,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl OpenAiBackend {
    /// Create a new `OpenAI`-compatible backend.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout,
        }
    }

    fn request_body(&self, messages: &[ChatMessage]) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });
        if let (Some(max_tokens), Some(map)) = (self.max_tokens, body.as_object_mut()) {
            map.insert(String::from("max_tokens"), serde_json::json!(max_tokens));
        }
        body
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.api_url);
        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&self.request_body(messages));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!(model = %self.model, messages = messages.len(), "openai-compatible request");
        let json = send_with_deadline(request, self.timeout).await?;
        extract_openai_content(&json)
    }
}

/// Extract the text content from an `OpenAI` chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, GenerationError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            GenerationError::MalformedResponse(
                "response missing choices[0].message.content".to_owned(),
            )
        })
}

/// Backend for the Anthropic Messages API.
///
/// Differences from the `OpenAI` format:
/// - `x-api-key` header instead of `Authorization: Bearer`
/// - system text is a top-level field, not a message
/// - roles must alternate and open with `user`
/// - the reply lives at `content[0].text`
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f64,
    max_tokens: u32,
    timeout: Duration,
}

impl AnthropicBackend {
    /// Create a new Anthropic Messages API backend.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens.unwrap_or(ANTHROPIC_DEFAULT_MAX_TOKENS),
            timeout: config.timeout,
        }
    }

    fn request_body(&self, messages: &[ChatMessage]) -> serde_json::Value {
        let (system, conversation) = split_for_anthropic(messages);
        let conversation: Vec<serde_json::Value> = conversation
            .into_iter()
            .map(|(role, content)| serde_json::json!({"role": role, "content": content}))
            .collect();
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": system,
            "messages": conversation,
        })
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        let url = format!("{}/messages", self.api_url);
        let mut request = self
            .client
            .post(&url)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&self.request_body(messages));
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        debug!(model = %self.model, messages = messages.len(), "anthropic request");
        let json = send_with_deadline(request, self.timeout).await?;
        extract_anthropic_content(&json)
    }
}

/// Split a message sequence into the system text and an alternating
/// user/assistant conversation that opens with a user turn.
fn split_for_anthropic(messages: &[ChatMessage]) -> (String, Vec<(ChatRole, String)>) {
    let system = messages
        .iter()
        .filter(|m| m.role == ChatRole::System)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut conversation: Vec<(ChatRole, String)> = Vec::new();
    for message in messages.iter().filter(|m| m.role != ChatRole::System) {
        if conversation.is_empty() && message.role == ChatRole::Assistant {
            conversation.push((ChatRole::User, ANTHROPIC_HISTORY_PREAMBLE.to_owned()));
        }
        match conversation.last_mut() {
            Some((role, content)) if *role == message.role => {
                content.push_str("\n\n");
                content.push_str(&message.content);
            }
            _ => conversation.push((message.role, message.content.clone())),
        }
    }
    (system, conversation)
}

/// Extract the text content from an Anthropic Messages API response.
fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, GenerationError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            GenerationError::MalformedResponse("response missing content[0].text".to_owned())
        })
}

/// Send a request under a deadline and decode a successful JSON body.
async fn send_with_deadline(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<serde_json::Value, GenerationError> {
    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    let exchange = async {
        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_elapsed| GenerationError::Timeout(timeout_ms))?
}

/// Create a backend from configuration.
pub fn create_backend(config: &LlmBackendConfig) -> LlmBackend {
    match config.backend_type {
        BackendType::OpenAi => LlmBackend::OpenAi(OpenAiBackend::new(config)),
        BackendType::Anthropic => LlmBackend::Anthropic(AnthropicBackend::new(config)),
    }
}
