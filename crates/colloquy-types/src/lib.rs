//! Shared type definitions for the Colloquy negotiation simulator.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries: agent descriptors, chat messages exchanged with a
//! text-generation backend, turn records, and the line-delimited wire
//! records streamed back to callers.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for simulation runs
//! - [`agent`] -- Agent configuration and knowledge source mode
//! - [`message`] -- Role-tagged chat messages
//! - [`transcript`] -- Turn records and streamed simulation events
//! - [`request`] -- Caller-facing request and response bodies

pub mod agent;
pub mod ids;
pub mod message;
pub mod request;
pub mod transcript;

pub use agent::{AgentConfig, KnowledgeMode};
pub use ids::SimulationId;
pub use message::{ChatMessage, ChatRole};
pub use request::{AgentSpec, SimulationRequest, TranscriptResponse};
pub use transcript::{SimulationEvent, TurnRecord};
