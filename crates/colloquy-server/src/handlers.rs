//! Route handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Browser client |
//! | `GET` | `/health` | Liveness and version |
//! | `GET` | `/api/presets` | Default three-party request body |
//! | `POST` | `/simulate` | Run to completion, return `{messages}` |
//! | `POST` | `/simulate_stream` | Run and stream NDJSON records |

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use colloquy_agents::TextGenerator;
use colloquy_agents::presets::{DEFAULT_SCENARIO, default_agents};
use colloquy_core::Simulation;
use colloquy_types::{AgentSpec, SimulationRequest, TranscriptResponse};
use futures::StreamExt;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Content type of the streamed transcript.
pub const STREAM_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Message returned when a request names no usable agent.
pub const NO_AGENTS_MESSAGE: &str = "No valid agents provided.";

/// Client served when the static directory has no `index.html`.
const EMBEDDED_INDEX: &str = include_str!("../assets/index.html");

/// Serve the browser client.
pub async fn index<G>(State(state): State<Arc<AppState<G>>>) -> Html<String> {
    if let Some(dir) = &state.static_dir {
        let path = dir.join("index.html");
        match tokio::fs::read_to_string(&path).await {
            Ok(page) => return Html(page),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "falling back to embedded client");
            }
        }
    }
    Html(EMBEDDED_INDEX.to_owned())
}

/// Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Default scenario and parties, shaped as a simulate request body.
pub async fn presets<G>(State(state): State<Arc<AppState<G>>>) -> Json<SimulationRequest> {
    Json(SimulationRequest {
        scenario: DEFAULT_SCENARIO.to_owned(),
        turns: Some(state.default_turns),
        agents: default_agents().iter().map(AgentSpec::from).collect(),
    })
}

/// Run a simulation and return every turn record at once.
pub async fn simulate<G: TextGenerator + 'static>(
    State(state): State<Arc<AppState<G>>>,
    body: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let simulation = prepare(&state, body).await?;
    let messages = simulation.run_to_end().await?;
    Ok(Json(TranscriptResponse { messages }))
}

/// Run a simulation and stream each record as soon as it exists.
///
/// Setup errors are answered with a JSON 400 before any line is written.
/// Once streaming starts, failures arrive as an `error` record. When the
/// client disconnects the body stream is dropped and no further turn runs.
pub async fn simulate_stream<G: TextGenerator + 'static>(
    State(state): State<Arc<AppState<G>>>,
    body: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let simulation = prepare(&state, body).await?;
    let lines = simulation
        .into_stream()
        .map(|event| event.to_ndjson_line());

    Ok((
        [(header::CONTENT_TYPE, STREAM_CONTENT_TYPE)],
        Body::from_stream(lines),
    )
        .into_response())
}

/// Validate a request and build its run.
///
/// Knowledge directories are read while agents are built, so construction
/// happens on the blocking pool.
async fn prepare<G: TextGenerator + 'static>(
    state: &Arc<AppState<G>>,
    body: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Simulation<G>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let configs = request.agent_configs();
    if configs.is_empty() {
        return Err(ApiError::BadRequest(NO_AGENTS_MESSAGE.to_owned()));
    }

    let turns = request.turns.unwrap_or(state.default_turns);
    if turns == 0 || turns > state.max_turns {
        return Err(ApiError::BadRequest(format!(
            "turns must be between 1 and {}",
            state.max_turns
        )));
    }

    let scenario = request.scenario;
    let settings = state.settings.clone();
    let prompts = Arc::clone(&state.prompts);
    let generator = Arc::clone(&state.generator);
    let simulation = tokio::task::spawn_blocking(move || {
        Simulation::new(&scenario, turns, configs, &settings, &prompts, generator)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("run setup task failed: {e}")))??;

    info!(
        simulation_id = %simulation.id(),
        agents = simulation.agents().len(),
        turns,
        backend = state.generator.name(),
        "simulation accepted"
    );
    Ok(simulation)
}
