//! Agents, knowledge stores, retrieval, and prompt assembly for the Colloquy
//! negotiation simulator.
//!
//! An [`Agent`] represents one party. It owns its [`AgentConfig`], a private
//! [`KnowledgeStore`], and the history of its own statements. Each turn it
//! retrieves a few relevant documents, renders a system block and a request
//! block through the [`PromptEngine`], and asks a [`TextGenerator`] for a
//! reply.
//!
//! # Modules
//!
//! - [`agent`] -- The agent entity and its `act` operation
//! - [`config`] -- Knowledge and retrieval settings
//! - [`error`] -- Error types for knowledge loading and prompt rendering
//! - [`generation`] -- The text-generation seam and its error type
//! - [`knowledge`] -- Documents, the per-agent store, and the directory loader
//! - [`presets`] -- A ready-made three-party scenario for local runs
//! - [`prompt`] -- Template loading and rendering via `minijinja`
//! - [`retrieval`] -- Keyword-overlap document selection
//!
//! [`AgentConfig`]: colloquy_types::AgentConfig

pub mod agent;
pub mod config;
pub mod error;
pub mod generation;
pub mod knowledge;
pub mod presets;
pub mod prompt;
pub mod retrieval;

pub use agent::Agent;
pub use config::AgentSettings;
pub use error::{AgentError, KnowledgeError, PromptError};
pub use generation::{GenerationError, TextGenerator};
pub use knowledge::{DirectoryLoader, Document, KnowledgeStore};
pub use prompt::PromptEngine;
pub use retrieval::select;
