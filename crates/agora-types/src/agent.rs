use serde::{Deserialize, Serialize};

use crate::id::{AgentId, RoomId};

/// A persona taking part in a room's conversation.
///
/// Agents belong to exactly one room and are read-only once the
/// simulation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub room_id: RoomId,
    pub name: String,
    /// Free-text role (e.g. "Pro side", "Editor").
    pub role: String,
    /// Free-text goal the persona pursues.
    pub goal: String,
}

/// Request to add an agent to a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub role: String,
    pub goal: String,
}
