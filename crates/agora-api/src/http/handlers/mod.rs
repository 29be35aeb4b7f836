//! HTTP request handlers for the REST API.

pub mod agent;
pub mod memory;
pub mod message;
pub mod room;
pub mod scenario;
pub mod simulate;

use agora_types::id::{AgentId, RoomId};
use tokio::sync::OwnedMutexGuard;

use crate::http::error::AppError;
use crate::state::AppState;

fn parse_room_id(s: &str) -> Result<RoomId, AppError> {
    s.parse::<RoomId>()
        .map_err(|_| AppError::Validation(format!("Invalid room id: {s}")))
}

fn parse_agent_id(s: &str) -> Result<AgentId, AppError> {
    s.parse::<AgentId>()
        .map_err(|_| AppError::Validation(format!("Invalid agent id: {s}")))
}

fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Take the room's turn lock, failing with 404 before any lock entry is
/// created for an unknown room.
async fn lock_room(state: &AppState, room_id: &RoomId) -> Result<OwnedMutexGuard<()>, AppError> {
    state.room_service.get_room(room_id).await?;
    Ok(state.turn_locks.acquire(room_id).await)
}
