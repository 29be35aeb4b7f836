//! Turn and judge handlers.
//!
//! Both hold the room's turn lock for the whole pipeline so two requests
//! against one room never pick the same speaker.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use agora_core::simulation::orchestrator::TurnOutcome;
use agora_types::message::Message;

use super::{elapsed_ms, lock_room, parse_room_id};
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Upper bound on turns run by one request.
pub const MAX_TURNS_PER_REQUEST: usize = 20;

#[derive(Debug, Deserialize)]
pub struct TurnQuery {
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

/// POST /api/v1/rooms/{id}/turn[?count=N] - Advance the conversation.
pub async fn take_turn(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TurnQuery>,
) -> Result<Json<ApiResponse<Vec<TurnOutcome>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    if query.count == 0 || query.count > MAX_TURNS_PER_REQUEST {
        return Err(AppError::Validation(format!(
            "count must be between 1 and {MAX_TURNS_PER_REQUEST}"
        )));
    }

    let room_id = parse_room_id(&id)?;
    let outcomes = {
        let _guard = lock_room(&state, &room_id).await?;
        state.orchestrator.advance_turns(&room_id, query.count).await?
    };

    let resp = ApiResponse::success(outcomes, request_id, elapsed_ms(start))
        .with_link("messages", &format!("/api/v1/rooms/{room_id}/messages"))
        .with_link("judge", &format!("/api/v1/rooms/{room_id}/judge"));
    Ok(Json(resp))
}

/// POST /api/v1/rooms/{id}/judge - Append judge commentary on the latest turn.
pub async fn judge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Message>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let room_id = parse_room_id(&id)?;
    let verdict = {
        let _guard = lock_room(&state, &room_id).await?;
        state.orchestrator.judge_last_turn(&room_id).await?
    };

    let resp = ApiResponse::success(verdict, request_id, elapsed_ms(start))
        .with_link("messages", &format!("/api/v1/rooms/{room_id}/messages"));
    Ok(Json(resp))
}
