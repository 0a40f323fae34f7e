//! Agent configuration: who a party is and where its knowledge comes from.

use serde::{Deserialize, Serialize};

/// Where an agent's private knowledge base is loaded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeMode {
    /// Only the inline knowledge text is used.
    #[default]
    Inline,
    /// The inline text plus every recognized file under a directory.
    #[serde(alias = "folder")]
    Directory,
}

/// Immutable identity and behavior descriptor for one party.
///
/// Created once at simulation setup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Display name, also used as the speaker label in the transcript.
    pub name: String,
    /// Short identifier shown alongside the name in prompts.
    pub short_name: String,
    /// Free-text description of the party's role.
    pub role_description: String,
    /// Free-text strategic preferences and goals.
    pub strategic_preferences: String,
    /// Inline background knowledge, embedded verbatim in the system block.
    pub knowledge: String,
    /// Knowledge source mode.
    pub knowledge_mode: KnowledgeMode,
    /// Directory scanned when `knowledge_mode` is [`KnowledgeMode::Directory`].
    pub knowledge_dir: Option<String>,
}

impl AgentConfig {
    /// Create a config with the given name and everything else empty.
    ///
    /// The short identifier defaults to the name itself.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            short_name: name.clone(),
            name,
            role_description: String::new(),
            strategic_preferences: String::new(),
            knowledge: String::new(),
            knowledge_mode: KnowledgeMode::Inline,
            knowledge_dir: None,
        }
    }

    /// The directory to scan, if directory mode is active and a path is set.
    pub fn knowledge_directory(&self) -> Option<&str> {
        match self.knowledge_mode {
            KnowledgeMode::Directory => self
                .knowledge_dir
                .as_deref()
                .filter(|dir| !dir.trim().is_empty()),
            KnowledgeMode::Inline => None,
        }
    }
}
