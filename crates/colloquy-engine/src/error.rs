//! Error types for the server binary.

/// Top-level error for the server binary.
///
/// Each variant wraps a startup or serving failure so `main` can
/// propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: colloquy_core::ConfigError,
    },

    /// Prompt templates could not be loaded.
    #[error("prompt template error: {source}")]
    Prompt {
        /// The underlying template error.
        #[from]
        source: colloquy_agents::PromptError,
    },

    /// The text-generation backend is misconfigured.
    #[error("backend config error: {source}")]
    Backend {
        /// The underlying backend config error.
        #[from]
        source: colloquy_llm::LlmConfigError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: colloquy_server::ServerError,
    },

    /// The logging filter could not be built.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },
}
