//! Caller-facing request and response bodies.
//!
//! [`AgentSpec`] is the loose shape callers send; it is validated into an
//! [`AgentConfig`] before a run starts.

use serde::{Deserialize, Serialize};

use crate::agent::{AgentConfig, KnowledgeMode};
use crate::transcript::TurnRecord;

/// Agent fields accepted from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Display name. Entries with an empty or missing name are skipped.
    #[serde(default)]
    pub name: String,
    /// Role description.
    #[serde(default)]
    pub role: String,
    /// Strategic preferences.
    #[serde(default)]
    pub strategic_preferences: String,
    /// Inline knowledge text.
    #[serde(default)]
    pub knowledge: String,
    /// Knowledge source mode (`inline` or `directory`/`folder`).
    #[serde(default)]
    pub knowledge_mode: KnowledgeMode,
    /// Knowledge directory path.
    #[serde(default, alias = "knowledge_dir")]
    pub knowledge_folder: String,
}

impl AgentSpec {
    /// Validate into an [`AgentConfig`].
    ///
    /// Returns `None` when the name is blank.
    pub fn into_config(self) -> Option<AgentConfig> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        let name = name.to_owned();
        let knowledge_dir = Some(self.knowledge_folder).filter(|dir| !dir.trim().is_empty());
        Some(AgentConfig {
            short_name: name.clone(),
            name,
            role_description: self.role,
            strategic_preferences: self.strategic_preferences,
            knowledge: self.knowledge,
            knowledge_mode: self.knowledge_mode,
            knowledge_dir,
        })
    }
}

impl From<&AgentConfig> for AgentSpec {
    fn from(config: &AgentConfig) -> Self {
        Self {
            name: config.name.clone(),
            role: config.role_description.clone(),
            strategic_preferences: config.strategic_preferences.clone(),
            knowledge: config.knowledge.clone(),
            knowledge_mode: config.knowledge_mode,
            knowledge_folder: config.knowledge_dir.clone().unwrap_or_default(),
        }
    }
}

/// Body of a simulate request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Scenario description; may be empty.
    #[serde(default)]
    pub scenario: String,
    /// Number of rounds. Falls back to the configured default when absent.
    #[serde(default)]
    pub turns: Option<u32>,
    /// Agents in speaking order.
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
}

impl SimulationRequest {
    /// Validated agent configs in request order, skipping nameless entries.
    pub fn agent_configs(&self) -> Vec<AgentConfig> {
        self.agents
            .iter()
            .cloned()
            .filter_map(AgentSpec::into_config)
            .collect()
    }
}

/// Body returned by the non-streaming simulate route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptResponse {
    /// Every turn record in emission order.
    pub messages: Vec<TurnRecord>,
}
