//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/scenarios", get(handlers::scenario::list_scenarios))
        // Rooms
        .route(
            "/rooms",
            get(handlers::room::list_rooms).post(handlers::room::create_room),
        )
        .route(
            "/rooms/{id}",
            get(handlers::room::get_room).delete(handlers::room::delete_room),
        )
        .route("/rooms/{id}/export", get(handlers::room::export_room))
        // Agents
        .route(
            "/rooms/{id}/agents",
            get(handlers::agent::list_agents).post(handlers::agent::add_agent),
        )
        .route(
            "/agents/{id}",
            get(handlers::agent::get_agent).delete(handlers::agent::remove_agent),
        )
        .route(
            "/agents/{id}/memories",
            get(handlers::memory::list_memories).delete(handlers::memory::wipe_memories),
        )
        // Transcript
        .route(
            "/rooms/{id}/messages",
            get(handlers::message::list_messages)
                .post(handlers::message::post_message)
                .delete(handlers::message::clear_messages),
        )
        // Simulation
        .route("/rooms/{id}/turn", post(handlers::simulate::take_turn))
        .route("/rooms/{id}/judge", post(handlers::simulate::judge));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Service version plus generation backend reachability.
async fn health_check(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    let ollama_version = state.ollama.health_check().await;
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "ollama": {
            "host": state.ollama.base_url(),
            "model": state.ollama.model(),
            "reachable": ollama_version.is_some(),
            "version": ollama_version,
        },
    }))
}
