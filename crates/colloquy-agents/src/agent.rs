//! The agent entity: one party and its private state.
//!
//! An agent owns its config, its knowledge store, and the history of its
//! own statements. The shared situation text is lent to [`Agent::act`] for
//! the duration of one turn and never retained.

use std::sync::Arc;

use colloquy_types::{AgentConfig, ChatMessage};
use tracing::{debug, warn};

use crate::config::AgentSettings;
use crate::error::AgentError;
use crate::generation::{TextGenerator, failure_notice};
use crate::knowledge::{DirectoryLoader, KnowledgeStore};
use crate::prompt::PromptEngine;

/// A simulated party taking turns in a negotiation.
pub struct Agent {
    config: AgentConfig,
    knowledge: KnowledgeStore,
    history: Vec<ChatMessage>,
    prompts: Arc<PromptEngine>,
    top_k: usize,
}

impl Agent {
    /// Create an agent, loading its knowledge store from its config.
    pub fn new(config: AgentConfig, settings: &AgentSettings, prompts: Arc<PromptEngine>) -> Self {
        let loader = DirectoryLoader::new(&settings.extensions);
        let knowledge = KnowledgeStore::from_config(&config, &loader);
        debug!(
            agent = config.name,
            documents = knowledge.len(),
            "agent knowledge loaded"
        );
        Self::with_knowledge(config, knowledge, settings.top_k, prompts)
    }

    /// Create an agent with an explicit knowledge store.
    pub const fn with_knowledge(
        config: AgentConfig,
        knowledge: KnowledgeStore,
        top_k: usize,
        prompts: Arc<PromptEngine>,
    ) -> Self {
        Self {
            config,
            knowledge,
            history: Vec::new(),
            prompts,
            top_k,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The immutable config this agent was built from.
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The agent's private knowledge store.
    pub const fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    /// The agent's own past statements, oldest first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Produce this agent's statement for the current situation.
    ///
    /// The reply is appended to the agent's history before it is returned.
    /// A failed generation call does not fail the turn: the reply becomes a
    /// visible failure notice instead.
    pub async fn act<G>(&mut self, global_context: &str, generator: &G) -> Result<String, AgentError>
    where
        G: TextGenerator,
    {
        let messages = self.build_messages(global_context)?;

        let reply = match generator.generate(&messages).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    agent = self.config.name,
                    backend = generator.name(),
                    error = %e,
                    "text generation failed, substituting failure notice"
                );
                failure_notice(&e)
            }
        };

        self.history.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// Assemble `[system, own history..., request]` for this turn.
    pub fn build_messages(&self, global_context: &str) -> Result<Vec<ChatMessage>, AgentError> {
        let prompt_error = |source| AgentError::Prompt {
            agent: self.config.name.clone(),
            source,
        };

        let system = self
            .prompts
            .render_system(&self.config)
            .map_err(prompt_error)?;
        let retrieved = self.knowledge.retrieve(global_context, self.top_k);
        let request = self
            .prompts
            .render_request(global_context, &retrieved)
            .map_err(prompt_error)?;

        let mut messages = Vec::with_capacity(self.history.len().saturating_add(2));
        messages.push(ChatMessage::system(system));
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(request));
        Ok(messages)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use colloquy_types::ChatRole;

    use super::*;
    use crate::generation::GenerationError;
    use crate::knowledge::Document;

    /// Replies with a fixed string and records every request it sees.
    #[derive(Default)]
    struct RecordingGenerator {
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
            let mut seen = self.seen.lock().unwrap();
            seen.push(messages.to_vec());
            Ok(format!("statement {}", seen.len()))
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _messages: &[ChatMessage]) -> Result<String, GenerationError> {
            Err(GenerationError::Request(String::from("connection refused")))
        }
    }

    fn agent_with(documents: Vec<Document>) -> Agent {
        Agent::with_knowledge(
            AgentConfig::named("Western Alliance"),
            KnowledgeStore::new(documents),
            3,
            Arc::new(PromptEngine::builtin().unwrap()),
        )
    }

    #[tokio::test]
    async fn history_grows_one_entry_per_turn() {
        let mut agent = agent_with(Vec::new());
        let generator = RecordingGenerator::default();

        for turn in 1..=3 {
            let reply = agent.act("Scenario: test", &generator).await.unwrap();
            assert_eq!(reply, format!("statement {turn}"));
        }

        let history = agent.history();
        assert_eq!(history.len(), 3);
        assert!(history.iter().all(|m| m.role == ChatRole::Assistant));
        assert_eq!(history[0].content, "statement 1");
        assert_eq!(history[2].content, "statement 3");
    }

    #[tokio::test]
    async fn messages_are_system_history_request() {
        let mut agent = agent_with(Vec::new());
        let generator = RecordingGenerator::default();

        agent.act("round one", &generator).await.unwrap();
        agent.act("round two", &generator).await.unwrap();

        let seen = generator.seen.lock().unwrap();
        let second = &seen[1];
        assert_eq!(second.len(), 3);
        assert_eq!(second[0].role, ChatRole::System);
        assert_eq!(second[1].role, ChatRole::Assistant);
        assert_eq!(second[1].content, "statement 1");
        assert_eq!(second[2].role, ChatRole::User);
        assert!(second[2].content.contains("round two"));
    }

    #[tokio::test]
    async fn relevant_knowledge_reaches_request() {
        let mut agent = agent_with(vec![
            Document::inline("winter gas reserves are low"),
            Document::inline("naval exercises planned"),
        ]);
        let generator = RecordingGenerator::default();

        agent.act("talk about gas", &generator).await.unwrap();

        let seen = generator.seen.lock().unwrap();
        let request = &seen[0][1].content;
        assert!(request.contains("winter gas reserves are low"));
        assert!(!request.contains("naval exercises planned"));
    }

    #[tokio::test]
    async fn generation_failure_becomes_visible_reply() {
        let mut agent = agent_with(Vec::new());

        let reply = agent.act("Scenario: test", &FailingGenerator).await.unwrap();
        assert!(reply.contains("text generation failed"));
        assert!(reply.contains("connection refused"));
        assert_eq!(agent.history().len(), 1);
        assert_eq!(agent.history()[0].content, reply);
    }

    #[test]
    fn new_loads_inline_knowledge() {
        let config = AgentConfig {
            knowledge: String::from("Inline brief."),
            ..AgentConfig::named("A")
        };
        let agent = Agent::new(
            config,
            &AgentSettings::default(),
            Arc::new(PromptEngine::builtin().unwrap()),
        );
        assert_eq!(agent.knowledge().len(), 1);
        assert_eq!(agent.name(), "A");
    }
}
