use thiserror::Error;

use crate::id::{AgentId, RoomId};
use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in agora-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the per-agent memory store.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("memory storage error: {0}")]
    Storage(String),
}

/// Terminal errors of a turn or judge pass.
///
/// Memory problems are deliberately absent: they degrade a turn but never
/// abort it.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    #[error("room {0} has no agents")]
    NoAgents(RoomId),

    #[error("room {0} has no messages to judge")]
    NoMessages(RoomId),

    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from room and agent management.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("room not found")]
    NotFound,

    #[error("agent not found")]
    AgentNotFound,

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("message content is empty")]
    EmptyMessage,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
}

/// A non-fatal memory problem observed during a turn.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemoryDegradation {
    /// Recall failed; the turn ran with no memories.
    RecallDegraded { agent_id: AgentId, reason: String },
    /// The reply was persisted but could not be memorized.
    WriteDegraded { agent_id: AgentId, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_simulation_error_mentions_room() {
        let room = RoomId::new();
        let err = SimulationError::NoAgents(room);
        assert!(err.to_string().contains(&room.to_string()));
    }

    #[test]
    fn test_generation_error_from_llm_error() {
        let err: SimulationError = LlmError::Timeout { timeout_secs: 5 }.into();
        assert!(matches!(err, SimulationError::Generation(LlmError::Timeout { .. })));
    }

    #[test]
    fn test_memory_degradation_serde_tag() {
        let d = MemoryDegradation::WriteDegraded {
            agent_id: AgentId::new(),
            reason: "disk full".to_string(),
        };
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"kind\":\"write_degraded\""));
    }
}
