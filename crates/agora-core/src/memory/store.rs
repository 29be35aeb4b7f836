//! MemoryStore trait definition.

use agora_types::error::MemoryError;
use agora_types::id::AgentId;

/// Per-agent semantic memory.
///
/// Implementations live in agora-infra (e.g., `SqliteMemoryStore`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MemoryStore: Send + Sync {
    /// Return up to `top_k` stored snippets most relevant to `query`, most
    /// relevant first.
    ///
    /// An agent with no stored items yields an empty vector, not an error.
    fn recall(
        &self,
        agent_id: &AgentId,
        query: &str,
        top_k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<String>, MemoryError>> + Send;

    /// Store one snippet for an agent.
    fn add(
        &self,
        agent_id: &AgentId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), MemoryError>> + Send;

    /// Delete the agent's entire memory set. Returns the count removed.
    fn wipe(
        &self,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<u64, MemoryError>> + Send;

    /// Number of snippets stored for an agent.
    fn count(
        &self,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<u64, MemoryError>> + Send;
}
