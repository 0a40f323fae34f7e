//! Error types for the agents crate.
//!
//! Knowledge failures never escape a load: they become placeholder
//! documents. Prompt failures do escape, because a broken template makes
//! every later turn fail the same way.

use std::path::PathBuf;

/// A single knowledge file or directory could not be read.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    /// Reading a file failed.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Listing a directory failed.
    #[error("failed to list {path}: {source}")]
    ReadDir {
        /// The directory that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised while loading or rendering prompt templates.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// A template file could not be read from disk.
    #[error("failed to read template {path}: {source}")]
    Io {
        /// The template path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A template failed to compile or render.
    #[error("template error in {name}: {source}")]
    Template {
        /// Template name.
        name: &'static str,
        /// The underlying template engine error.
        source: minijinja::Error,
    },
}

/// Errors that abort an agent's turn.
///
/// Text-generation failures are not represented here; they are absorbed
/// into a visible failure-notice reply.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Prompt assembly failed.
    #[error("prompt assembly failed for {agent}: {source}")]
    Prompt {
        /// Name of the agent whose turn failed.
        agent: String,
        /// The underlying prompt error.
        source: PromptError,
    },
}
