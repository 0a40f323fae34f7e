//! The shared, append-only situation text.
//!
//! The context starts with a scenario line. After every turn the
//! orchestrator appends one entry. Nothing is ever removed or rewritten, so
//! the text is always the scenario line followed by every prior turn in
//! emission order, and can be rebuilt from the emitted records alone.

use std::fmt;

use colloquy_types::TurnRecord;

/// Scenario line used when the caller supplies no scenario.
pub const EMPTY_SCENARIO: &str = "(none provided)";

/// The growing narrative shared by all agents in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalContext {
    text: String,
}

impl GlobalContext {
    /// Start a context from a scenario description.
    pub fn new(scenario: &str) -> Self {
        let scenario = scenario.trim();
        let scenario = if scenario.is_empty() {
            EMPTY_SCENARIO
        } else {
            scenario
        };
        Self {
            text: format!("Scenario: {scenario}"),
        }
    }

    /// Append one turn entry.
    pub fn append_turn(&mut self, record: &TurnRecord) {
        self.text.push_str(&format!(
            "\n\n[Round {} - {}]: {}",
            record.round, record.speaker, record.content
        ));
    }

    /// Rebuild a context from a scenario and the records emitted so far.
    pub fn replay<'a, I>(scenario: &str, records: I) -> Self
    where
        I: IntoIterator<Item = &'a TurnRecord>,
    {
        let mut context = Self::new(scenario);
        for record in records {
            context.append_turn(record);
        }
        context
    }

    /// The full text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for GlobalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
