//! Error types for simulation setup and the turn loop.

/// Errors that stop a simulation from starting or from finishing.
///
/// Text-generation and knowledge-loading failures are not listed: both are
/// recovered where they happen and leave a visible trace instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// The request cannot be simulated (no valid agents, zero rounds).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An unexpected failure inside the turn loop. Terminates the run.
    #[error("internal error: {0}")]
    Internal(String),
}
