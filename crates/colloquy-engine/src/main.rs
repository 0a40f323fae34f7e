//! Server binary for the Colloquy negotiation simulator.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `colloquy-config.yaml` (or `COLLOQUY_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Compile prompt templates, built-in or from `simulation.templates_dir`
//! 4. Create the text-generation backend (key from `LLM_API_KEY`)
//! 5. Serve the HTTP transport until `Ctrl-C`

mod error;
mod logging;

use std::path::Path;
use std::sync::Arc;

use colloquy_agents::{PromptEngine, TextGenerator};
use colloquy_core::ColloquyConfig;
use colloquy_llm::{LlmBackendConfig, create_backend};
use colloquy_server::{AppState, ServerConfig, start_server};
use tracing::{info, warn};

use crate::error::EngineError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, source) = ColloquyConfig::load().map_err(EngineError::from)?;

    logging::init(&config.logging)?;
    info!("colloquy-engine starting");
    match &source {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("No configuration file found, using defaults"),
    }

    let prompts = match &config.simulation.templates_dir {
        Some(dir) => {
            let engine = PromptEngine::from_dir(Path::new(dir)).map_err(EngineError::from)?;
            info!(templates_dir = %dir, "Prompt templates loaded");
            engine
        }
        None => PromptEngine::builtin().map_err(EngineError::from)?,
    };

    let backend_config = LlmBackendConfig::from_section(&config.llm).map_err(EngineError::from)?;
    if backend_config.api_key.is_none() {
        warn!(
            "LLM_API_KEY is not set; requests go out without credentials and hosted services will reject them"
        );
    }
    let backend = create_backend(&backend_config);
    info!(
        backend = backend.name(),
        api_url = %backend_config.api_url,
        model = %backend_config.model,
        temperature = backend_config.temperature,
        timeout_ms = config.llm.timeout_ms,
        "Text-generation backend ready"
    );

    let mut state = AppState::new(
        Arc::new(backend),
        Arc::new(prompts),
        config.knowledge.agent_settings(),
        config.simulation.default_turns,
        config.simulation.max_turns,
    );
    let static_dir = Path::new(&config.server.static_dir);
    if static_dir.is_dir() {
        state = state.with_static_dir(static_dir);
    } else {
        info!(static_dir = %static_dir.display(), "Static directory absent, serving built-in client");
    }

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    start_server(&server_config, Arc::new(state))
        .await
        .map_err(EngineError::from)?;

    info!("colloquy-engine stopped");
    Ok(())
}
