//! Long-term memory item type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{AgentId, MemoryId};

/// One remembered snippet belonging to exactly one agent.
///
/// Created once per generated reply and never mutated; removed only when
/// the agent's whole memory set is wiped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryItem {
    pub id: MemoryId,
    pub agent_id: AgentId,
    pub content: String,
    /// Embedding model that produced the stored vector.
    pub embedding_model: String,
    pub created_at: DateTime<Utc>,
}
