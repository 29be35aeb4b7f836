//! Agent handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use agora_types::agent::{Agent, CreateAgentRequest};

use super::{elapsed_ms, lock_room, parse_agent_id, parse_room_id};
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/rooms/{id}/agents - Agents in speaking order.
pub async fn list_agents(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Agent>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let room_id = parse_room_id(&id)?;
    let agents = state.room_service.list_agents(&room_id).await?;

    let resp = ApiResponse::success(agents, request_id, elapsed_ms(start))
        .with_link("self", &format!("/api/v1/rooms/{room_id}/agents"))
        .with_link("room", &format!("/api/v1/rooms/{room_id}"));
    Ok(Json(resp))
}

/// POST /api/v1/rooms/{id}/agents - Add an agent at the end of the speaking order.
pub async fn add_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateAgentRequest>,
) -> Result<Json<ApiResponse<Agent>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let room_id = parse_room_id(&id)?;
    let agent = {
        let _guard = lock_room(&state, &room_id).await?;
        state.room_service.add_agent(&room_id, body).await?
    };

    let mut resp = ApiResponse::success(agent.clone(), request_id, elapsed_ms(start));
    resp.links.insert("self".to_string(), format!("/api/v1/agents/{}", agent.id));
    resp.links.insert("memories".to_string(), format!("/api/v1/agents/{}/memories", agent.id));
    Ok(Json(resp))
}

/// GET /api/v1/agents/{id} - Get a single agent.
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Agent>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let agent_id = parse_agent_id(&id)?;
    let agent = state.room_service.get_agent(&agent_id).await?;

    let resp = ApiResponse::success(agent.clone(), request_id, elapsed_ms(start))
        .with_link("room", &format!("/api/v1/rooms/{}", agent.room_id))
        .with_link("memories", &format!("/api/v1/agents/{}/memories", agent.id));
    Ok(Json(resp))
}

/// DELETE /api/v1/agents/{id} - Remove an agent and wipe its memory.
///
/// Its past messages keep their author id.
pub async fn remove_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let agent_id = parse_agent_id(&id)?;
    let agent = state.room_service.get_agent(&agent_id).await?;
    let removed = {
        let _guard = state.turn_locks.acquire(&agent.room_id).await;
        state.room_service.remove_agent(&agent_id).await?
    };

    let resp = ApiResponse::success(
        serde_json::json!({ "deleted": true, "agent_id": removed.id, "name": removed.name }),
        request_id,
        elapsed_ms(start),
    );
    Ok(Json(resp))
}
