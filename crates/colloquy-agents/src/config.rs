//! Knowledge and retrieval settings shared by every agent in a run.

/// Default file extensions recognized as plain-text knowledge.
pub const DEFAULT_KNOWLEDGE_EXTENSIONS: [&str; 3] = ["txt", "md", "log"];

/// Default number of documents retrieved per turn.
pub const DEFAULT_TOP_K: usize = 3;

/// Settings applied when building agents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    /// Recognized knowledge file extensions, lowercase, without a leading dot.
    pub extensions: Vec<String>,
    /// Maximum documents retrieved per turn.
    pub top_k: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_KNOWLEDGE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_owned())
                .collect(),
            top_k: DEFAULT_TOP_K,
        }
    }
}
