//! HTTP transport for the Colloquy negotiation simulator.
//!
//! Exposes the [`Simulation`] orchestrator over Axum:
//!
//! - **`POST /simulate_stream`** runs a simulation and streams one JSON
//!   record per line while agents speak
//! - **`POST /simulate`** runs a simulation and returns the full transcript
//! - **`GET /api/presets`** returns a ready-made three-party request body
//! - **`GET /`** serves the browser client, **`/static/*`** its assets
//!
//! Every request builds its own run. Nothing is shared between runs except
//! the text generator, the compiled prompt templates, and the settings.
//!
//! [`Simulation`]: colloquy_core::Simulation

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
