//! Shared state handed to every route.

use std::path::PathBuf;
use std::sync::Arc;

use colloquy_agents::{AgentSettings, PromptEngine};

/// Long-lived pieces every run borrows from.
///
/// Runs themselves are not stored here: each request builds and owns its
/// own [`Simulation`](colloquy_core::Simulation).
pub struct AppState<G> {
    /// Text-generation backend shared by all runs.
    pub generator: Arc<G>,
    /// Compiled prompt templates.
    pub prompts: Arc<PromptEngine>,
    /// Knowledge loading and retrieval settings.
    pub settings: AgentSettings,
    /// Rounds used when a request omits `turns`.
    pub default_turns: u32,
    /// Largest accepted `turns`.
    pub max_turns: u32,
    /// Directory holding `index.html` and client assets, if any.
    pub static_dir: Option<PathBuf>,
}

impl<G> AppState<G> {
    /// Create state with no static directory.
    pub const fn new(
        generator: Arc<G>,
        prompts: Arc<PromptEngine>,
        settings: AgentSettings,
        default_turns: u32,
        max_turns: u32,
    ) -> Self {
        Self {
            generator,
            prompts,
            settings,
            default_turns,
            max_turns,
            static_dir: None,
        }
    }

    /// Serve the client and its assets from `dir`.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}
