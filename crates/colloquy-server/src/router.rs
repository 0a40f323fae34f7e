//! Axum router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use colloquy_agents::TextGenerator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete router.
///
/// - `GET /` -- browser client
/// - `GET /health` -- liveness
/// - `GET /api/presets` -- default request body
/// - `POST /simulate` -- batch transcript
/// - `POST /simulate_stream` -- NDJSON transcript stream
/// - `GET /static/*` -- files under the static directory, when configured
///
/// CORS allows any origin so the client can be served from elsewhere
/// during development.
pub fn build_router<G: TextGenerator + 'static>(state: Arc<AppState<G>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(handlers::index::<G>))
        .route("/health", get(handlers::health))
        .route("/api/presets", get(handlers::presets::<G>))
        .route("/simulate", post(handlers::simulate::<G>))
        .route("/simulate_stream", post(handlers::simulate_stream::<G>));

    if let Some(dir) = &state.static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
