//! Turn records and the events streamed to callers while a run progresses.

use serde::{Deserialize, Serialize};

/// One statement emitted by one agent in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Round number, starting at 1.
    #[serde(alias = "turn")]
    pub round: u32,
    /// Display name of the speaking agent.
    pub speaker: String,
    /// Statement text.
    pub content: String,
}

/// A record in the line-delimited output stream of a run.
///
/// Serialized as `{"type": ..., "data": ...}`:
///
/// ```text
/// {"type":"message","data":{"round":1,"speaker":"A","content":"..."}}
/// {"type":"done","data":{"total_messages":4}}
/// {"type":"error","data":"..."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum SimulationEvent {
    /// An agent finished its turn.
    Message(TurnRecord),
    /// The run completed normally.
    Done {
        /// Number of turn records emitted.
        total_messages: usize,
    },
    /// The run terminated on an unrecoverable error.
    Error(String),
}

impl SimulationEvent {
    /// Encode as a single JSON line terminated by `\n`.
    pub fn to_ndjson_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Whether no further events follow this one.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn message_wire_shape() {
        let event = SimulationEvent::Message(TurnRecord {
            round: 2,
            speaker: String::from("B"),
            content: String::from("we accept a ceasefire"),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "message");
        assert_eq!(json["data"]["round"], 2);
        assert_eq!(json["data"]["speaker"], "B");
        assert!(!event.is_terminal());
    }

    #[test]
    fn done_and_error_wire_shape() {
        let done = serde_json::to_value(SimulationEvent::Done { total_messages: 4 })
            .unwrap();
        assert_eq!(done["type"], "done");
        assert_eq!(done["data"]["total_messages"], 4);

        let error = serde_json::to_value(SimulationEvent::Error(String::from("boom")))
            .unwrap();
        assert_eq!(error["type"], "error");
        assert_eq!(error["data"], "boom");
    }

    #[test]
    fn ndjson_line_is_single_terminated_line() {
        let line = SimulationEvent::Message(TurnRecord {
            round: 1,
            speaker: String::from("A"),
            content: String::from("line one\nline two"),
        })
        .to_ndjson_line()
        .unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn legacy_turn_key_is_accepted() {
        let record: Result<TurnRecord, _> =
            serde_json::from_str(r#"{"turn":3,"speaker":"C","content":"x"}"#);
        assert_eq!(record.map(|r| r.round).ok(), Some(3));
    }
}
