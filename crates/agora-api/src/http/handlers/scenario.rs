//! Scenario catalog handler.

use std::time::Instant;

use axum::Json;
use serde::Serialize;

use agora_types::scenario::{PersonaDefinition, ScenarioMode, builtin_scenarios};

use super::elapsed_ms;
use crate::http::response::ApiResponse;

/// Catalog entry as exposed over the API.
#[derive(Debug, Serialize)]
pub struct ScenarioView {
    pub key: &'static str,
    pub description: &'static str,
    pub mode: ScenarioMode,
    pub agents: &'static [PersonaDefinition],
}

/// GET /api/v1/scenarios - List the built-in scenarios.
pub async fn list_scenarios() -> Json<ApiResponse<Vec<ScenarioView>>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let scenarios = builtin_scenarios()
        .iter()
        .map(|s| ScenarioView {
            key: s.key,
            description: s.description,
            mode: s.mode(),
            agents: s.agents,
        })
        .collect();

    Json(ApiResponse::success(scenarios, request_id, elapsed_ms(start)).with_link("self", "/api/v1/scenarios"))
}
