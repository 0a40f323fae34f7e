//! The text-generation seam.
//!
//! Agents talk to a hosted model only through [`TextGenerator`]. Concrete
//! HTTP backends live in `colloquy-llm`; tests plug in deterministic stubs.

use std::future::Future;

use colloquy_types::ChatMessage;

/// Errors a text-generation backend can report.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The request never produced a response (network, TLS, DNS).
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The response did not contain generated text where expected.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The call exceeded its deadline.
    #[error("timed out after {0} ms")]
    Timeout(u64),
}

/// Produces a reply for an ordered sequence of role-tagged messages.
///
/// Implementations must be shareable across tasks. A single simulation run
/// never has two calls in flight at once.
pub trait TextGenerator: Send + Sync {
    /// Generate a reply to `messages`.
    fn generate(
        &self,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;

    /// Human-readable backend name for logging.
    fn name(&self) -> &str {
        "text-generator"
    }
}

/// The reply substituted when generation fails.
pub fn failure_notice(error: &GenerationError) -> String {
    format!("[text generation failed: {error}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_notice_is_visible() {
        let notice = failure_notice(&GenerationError::Status {
            status: 401,
            body: String::from("invalid api key"),
        });
        assert!(notice.starts_with("[text generation failed"));
        assert!(notice.contains("401"));
        assert!(notice.contains("invalid api key"));
    }
}
