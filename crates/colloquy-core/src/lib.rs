//! Round-robin orchestration, shared context, and configuration for the
//! Colloquy negotiation simulator.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `colloquy-config.yaml` into
//!   strongly-typed structs.
//! - [`context`] -- The append-only [`GlobalContext`] every agent reads.
//! - [`error`] -- [`SimulationError`] for setup and turn-loop failures.
//! - [`simulation`] -- The [`Simulation`] orchestrator: fixed-order turns,
//!   streamed as they are produced.
//! - [`stub`] -- Deterministic [`TextGenerator`] stand-ins for tests and
//!   offline runs.
//!
//! [`GlobalContext`]: context::GlobalContext
//! [`SimulationError`]: error::SimulationError
//! [`Simulation`]: simulation::Simulation
//! [`TextGenerator`]: colloquy_agents::TextGenerator

pub mod config;
pub mod context;
pub mod error;
pub mod simulation;
pub mod stub;

pub use config::{ColloquyConfig, ConfigError};
pub use context::GlobalContext;
pub use error::SimulationError;
pub use simulation::{RunState, Simulation};
