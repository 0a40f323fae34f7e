//! The simulation orchestrator.
//!
//! A [`Simulation`] owns one run: its agents in speaking order, the shared
//! [`GlobalContext`], and the round/turn cursor. Each call to
//! [`Simulation::next_event`] performs at most one agent turn and returns
//! the resulting event, so callers receive turns as soon as they exist.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --> Running(round, agent_index) --> Done
//!                  |
//!                  +--> Failed
//! ```
//!
//! Turns are strictly sequential. A turn starts only after the previous
//! reply has been generated and appended to the context, so every agent
//! sees every earlier turn, including those from the current round.

use std::sync::Arc;

use colloquy_agents::{Agent, AgentSettings, PromptEngine, TextGenerator};
use colloquy_types::{AgentConfig, SimulationEvent, SimulationId, TurnRecord};
use futures::Stream;
use tracing::{debug, error, info};

use crate::context::GlobalContext;
use crate::error::SimulationError;

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No turn has been taken yet.
    Idle,
    /// The next turn belongs to `agent_index` in `round` (1-based).
    Running {
        /// Current round.
        round: u32,
        /// Index of the next agent to speak.
        agent_index: usize,
    },
    /// All rounds completed and the done marker was emitted.
    Done,
    /// An unrecoverable error terminated the run.
    Failed,
}

/// One isolated simulation run.
pub struct Simulation<G> {
    id: SimulationId,
    agents: Vec<Agent>,
    context: GlobalContext,
    generator: Arc<G>,
    turns: u32,
    state: RunState,
    emitted: usize,
}

impl<G: TextGenerator> Simulation<G> {
    /// Build a run from agent configs.
    ///
    /// Each config becomes an [`Agent`] with its knowledge store loaded.
    /// Configs with a blank name are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidInput`] if no agent remains or
    /// `turns` is zero.
    pub fn new(
        scenario: &str,
        turns: u32,
        configs: Vec<AgentConfig>,
        settings: &AgentSettings,
        prompts: &Arc<PromptEngine>,
        generator: Arc<G>,
    ) -> Result<Self, SimulationError> {
        let agents = configs
            .into_iter()
            .filter(|config| !config.name.trim().is_empty())
            .map(|config| Agent::new(config, settings, Arc::clone(prompts)))
            .collect();
        Self::from_agents(scenario, turns, agents, generator)
    }

    /// Build a run from already constructed agents.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidInput`] if `agents` is empty or
    /// `turns` is zero.
    pub fn from_agents(
        scenario: &str,
        turns: u32,
        agents: Vec<Agent>,
        generator: Arc<G>,
    ) -> Result<Self, SimulationError> {
        if agents.is_empty() {
            return Err(SimulationError::InvalidInput(String::from(
                "no valid agents provided",
            )));
        }
        if turns == 0 {
            return Err(SimulationError::InvalidInput(String::from(
                "turns must be at least 1",
            )));
        }

        Ok(Self {
            id: SimulationId::new(),
            agents,
            context: GlobalContext::new(scenario),
            generator,
            turns,
            state: RunState::Idle,
            emitted: 0,
        })
    }

    /// Identifier of this run.
    pub const fn id(&self) -> SimulationId {
        self.id
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// The shared context as it stands now.
    pub const fn context(&self) -> &GlobalContext {
        &self.context
    }

    /// Agents in speaking order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Number of turn records emitted so far.
    pub const fn emitted(&self) -> usize {
        self.emitted
    }

    /// Advance the run by one step.
    ///
    /// Returns the next event: a turn record, the done marker after the
    /// final turn, or an error marker if the run failed. Returns `None`
    /// once a terminal marker has been emitted.
    pub async fn next_event(&mut self) -> Option<SimulationEvent> {
        let (round, agent_index) = match self.state {
            RunState::Idle => {
                info!(
                    simulation_id = %self.id,
                    agents = self.agents.len(),
                    turns = self.turns,
                    "simulation starting"
                );
                (1, 0)
            }
            RunState::Running { round, agent_index } => (round, agent_index),
            RunState::Done | RunState::Failed => return None,
        };

        if round > self.turns {
            self.state = RunState::Done;
            info!(
                simulation_id = %self.id,
                total_messages = self.emitted,
                "simulation complete"
            );
            return Some(SimulationEvent::Done {
                total_messages: self.emitted,
            });
        }

        let Some(agent) = self.agents.get_mut(agent_index) else {
            return Some(self.fail(format!("no agent at position {agent_index}")));
        };

        debug!(
            simulation_id = %self.id,
            round,
            agent = agent.name(),
            "agent turn starting"
        );

        let outcome = agent
            .act(self.context.as_str(), self.generator.as_ref())
            .await;
        match outcome {
            Ok(reply) => {
                let record = TurnRecord {
                    round,
                    speaker: agent.name().to_owned(),
                    content: reply,
                };
                self.context.append_turn(&record);
                self.emitted = self.emitted.saturating_add(1);
                self.state = self.advance(round, agent_index);
                Some(SimulationEvent::Message(record))
            }
            Err(e) => Some(self.fail(e.to_string())),
        }
    }

    /// Run every remaining turn and collect the transcript.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Internal`] if the run fails part way.
    pub async fn run_to_end(mut self) -> Result<Vec<TurnRecord>, SimulationError> {
        let mut records = Vec::new();
        while let Some(event) = self.next_event().await {
            match event {
                SimulationEvent::Message(record) => records.push(record),
                SimulationEvent::Done { .. } => break,
                SimulationEvent::Error(description) => {
                    return Err(SimulationError::Internal(description));
                }
            }
        }
        Ok(records)
    }

    /// Turn the run into a lazy, finite stream of events.
    ///
    /// The stream ends after the done or error marker. Dropping it stops
    /// the run before the next turn starts.
    pub fn into_stream(self) -> impl Stream<Item = SimulationEvent> + Send
    where
        G: 'static,
    {
        futures::stream::unfold(self, |mut simulation| async move {
            let event = simulation.next_event().await?;
            Some((event, simulation))
        })
    }

    /// Cursor position after the turn at `(round, agent_index)`.
    fn advance(&self, round: u32, agent_index: usize) -> RunState {
        let next_index = agent_index.saturating_add(1);
        if next_index < self.agents.len() {
            RunState::Running {
                round,
                agent_index: next_index,
            }
        } else {
            RunState::Running {
                round: round.saturating_add(1),
                agent_index: 0,
            }
        }
    }

    fn fail(&mut self, description: String) -> SimulationEvent {
        error!(
            simulation_id = %self.id,
            emitted = self.emitted,
            error = description,
            "simulation failed"
        );
        self.state = RunState::Failed;
        SimulationEvent::Error(description)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use colloquy_agents::KnowledgeStore;

    use super::*;
    use crate::stub::{EchoGenerator, FailingGenerator};

    fn prompts() -> Arc<PromptEngine> {
        Arc::new(PromptEngine::builtin().unwrap())
    }

    fn configs(names: &[&str]) -> Vec<AgentConfig> {
        names.iter().map(|n| AgentConfig::named(*n)).collect()
    }

    fn simulation<G: TextGenerator>(
        turns: u32,
        names: &[&str],
        generator: G,
    ) -> Simulation<G> {
        Simulation::new(
            "Border talks",
            turns,
            configs(names),
            &AgentSettings::default(),
            &prompts(),
            Arc::new(generator),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn state_moves_from_idle_through_running_to_done() {
        let mut sim = simulation(1, &["A", "B"], EchoGenerator);
        assert_eq!(sim.state(), RunState::Idle);

        sim.next_event().await;
        assert_eq!(
            sim.state(),
            RunState::Running {
                round: 1,
                agent_index: 1
            }
        );

        sim.next_event().await;
        assert_eq!(
            sim.state(),
            RunState::Running {
                round: 2,
                agent_index: 0
            }
        );

        let done = sim.next_event().await;
        assert_eq!(done, Some(SimulationEvent::Done { total_messages: 2 }));
        assert_eq!(sim.state(), RunState::Done);
        assert_eq!(sim.next_event().await, None);
    }

    #[tokio::test]
    async fn zero_turns_is_invalid() {
        let result = Simulation::new(
            "s",
            0,
            configs(&["A"]),
            &AgentSettings::default(),
            &prompts(),
            Arc::new(EchoGenerator),
        );
        assert!(matches!(result, Err(SimulationError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn later_agents_see_same_round_replies() {
        let mut sim = simulation(1, &["A", "B"], EchoGenerator);
        let first = sim.next_event().await.unwrap();
        let second = sim.next_event().await.unwrap();

        let SimulationEvent::Message(a) = first else {
            panic!("expected message");
        };
        let SimulationEvent::Message(b) = second else {
            panic!("expected message");
        };
        assert!(!a.content.contains("[Round 1 - A]"));
        assert!(b.content.contains(&format!("[Round 1 - A]: {}", a.content)));
    }

    #[tokio::test]
    async fn failing_generator_still_completes() {
        let records = simulation(3, &["A", "B"], FailingGenerator)
            .run_to_end()
            .await
            .unwrap();
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|r| r.content.contains("text generation failed")));
    }

    #[tokio::test]
    async fn history_tracks_only_own_turns() {
        let agents = vec![
            Agent::with_knowledge(AgentConfig::named("A"), KnowledgeStore::default(), 3, prompts()),
            Agent::with_knowledge(AgentConfig::named("B"), KnowledgeStore::default(), 3, prompts()),
        ];
        let mut sim = Simulation::from_agents("s", 3, agents, Arc::new(EchoGenerator)).unwrap();
        while sim.next_event().await.is_some() {}

        for agent in sim.agents() {
            assert_eq!(agent.history().len(), 3);
        }
        assert_eq!(sim.emitted(), 6);
    }
}
