//! Per-agent memory handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use agora_types::error::RoomError;
use agora_types::memory::MemoryItem;

use super::{elapsed_ms, parse_agent_id};
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/agents/{id}/memories - Memory items, newest first.
pub async fn list_memories(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MemoryItem>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let agent_id = parse_agent_id(&id)?;
    state.room_service.get_agent(&agent_id).await?;
    let items = state
        .memory_store
        .list_items(&agent_id)
        .await
        .map_err(RoomError::from)?;

    let resp = ApiResponse::success(items, request_id, elapsed_ms(start))
        .with_link("self", &format!("/api/v1/agents/{agent_id}/memories"))
        .with_link("agent", &format!("/api/v1/agents/{agent_id}"));
    Ok(Json(resp))
}

/// DELETE /api/v1/agents/{id}/memories - Wipe an agent's memory.
pub async fn wipe_memories(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let agent_id = parse_agent_id(&id)?;
    let removed = state.room_service.wipe_agent_memory(&agent_id).await?;

    let resp = ApiResponse::success(
        serde_json::json!({ "wiped": true, "agent_id": agent_id, "memories_removed": removed }),
        request_id,
        elapsed_ms(start),
    );
    Ok(Json(resp))
}
