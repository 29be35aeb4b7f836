//! Room CRUD and export handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Serialize;

use agora_types::agent::Agent;
use agora_types::room::{CreateRoomRequest, Room};

use super::{elapsed_ms, lock_room, parse_room_id};
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// A room together with its participants.
#[derive(Debug, Serialize)]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: Room,
    pub agents: Vec<Agent>,
    pub message_count: usize,
}

fn room_links(resp: ApiResponse<RoomDetail>, room: &Room) -> ApiResponse<RoomDetail> {
    let base = format!("/api/v1/rooms/{}", room.id);
    resp.with_link("agents", &format!("{base}/agents"))
        .with_link("messages", &format!("{base}/messages"))
        .with_link("turn", &format!("{base}/turn"))
        .with_link("judge", &format!("{base}/judge"))
        .with_link("export", &format!("{base}/export"))
        .with_link("self", &base)
}

/// POST /api/v1/rooms - Create a room, seeding the scenario's personas.
pub async fn create_room(
    State(state): State<AppState>,
    Json(body): Json<CreateRoomRequest>,
) -> Result<Json<ApiResponse<RoomDetail>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let (room, agents) = state.room_service.create_room(body).await?;
    let detail = RoomDetail {
        room: room.clone(),
        agents,
        message_count: 0,
    };

    let resp = ApiResponse::success(detail, request_id, elapsed_ms(start));
    Ok(Json(room_links(resp, &room)))
}

/// GET /api/v1/rooms - List rooms, newest first.
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Room>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let rooms = state.room_service.list_rooms().await?;
    let resp = ApiResponse::success(rooms, request_id, elapsed_ms(start)).with_link("self", "/api/v1/rooms");
    Ok(Json(resp))
}

/// GET /api/v1/rooms/{id} - Room with agents and transcript size.
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RoomDetail>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let room_id = parse_room_id(&id)?;
    let room = state.room_service.get_room(&room_id).await?;
    let agents = state.room_service.list_agents(&room_id).await?;
    let message_count = state.room_service.list_messages(&room_id).await?.len();

    let detail = RoomDetail {
        room: room.clone(),
        agents,
        message_count,
    };
    let resp = ApiResponse::success(detail, request_id, elapsed_ms(start));
    Ok(Json(room_links(resp, &room)))
}

/// DELETE /api/v1/rooms/{id} - Delete a room with its agents, transcript and memories.
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let room_id = parse_room_id(&id)?;
    {
        let _guard = lock_room(&state, &room_id).await?;
        state.room_service.delete_room(&room_id).await?;
    }
    state.turn_locks.remove(&room_id);

    let resp = ApiResponse::success(
        serde_json::json!({ "deleted": true, "room_id": room_id }),
        request_id,
        elapsed_ms(start),
    );
    Ok(Json(resp))
}

/// GET /api/v1/rooms/{id}/export - Transcript as Markdown.
pub async fn export_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let room_id = parse_room_id(&id)?;
    let markdown = state.room_service.export_markdown(&room_id).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    ))
}
