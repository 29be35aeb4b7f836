//! Transcript handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use agora_types::message::{CreateMessageRequest, Message};

use super::{elapsed_ms, lock_room, parse_room_id};
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/rooms/{id}/messages - Full transcript, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let room_id = parse_room_id(&id)?;
    let messages = state.room_service.list_messages(&room_id).await?;

    let resp = ApiResponse::success(messages, request_id, elapsed_ms(start))
        .with_link("self", &format!("/api/v1/rooms/{room_id}/messages"))
        .with_link("export", &format!("/api/v1/rooms/{room_id}/export"));
    Ok(Json(resp))
}

/// POST /api/v1/rooms/{id}/messages - Post human input (no agent).
///
/// A body starting with `TOPIC:` sets the topic for short-mode rooms.
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateMessageRequest>,
) -> Result<Json<ApiResponse<Message>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let room_id = parse_room_id(&id)?;
    let message = {
        let _guard = lock_room(&state, &room_id).await?;
        state.room_service.post_message(&room_id, body).await?
    };

    let resp = ApiResponse::success(message, request_id, elapsed_ms(start))
        .with_link("messages", &format!("/api/v1/rooms/{room_id}/messages"));
    Ok(Json(resp))
}

/// DELETE /api/v1/rooms/{id}/messages - Clear the transcript.
///
/// Agents and their memories are kept.
pub async fn clear_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let room_id = parse_room_id(&id)?;
    let removed = {
        let _guard = lock_room(&state, &room_id).await?;
        state.room_service.clear_transcript(&room_id).await?
    };

    let resp = ApiResponse::success(
        serde_json::json!({ "cleared": true, "room_id": room_id, "messages_removed": removed }),
        request_id,
        elapsed_ms(start),
    );
    Ok(Json(resp))
}
