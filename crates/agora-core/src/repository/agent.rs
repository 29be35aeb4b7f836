//! Agent repository trait definition.

use agora_types::agent::Agent;
use agora_types::error::RepositoryError;
use agora_types::id::{AgentId, RoomId};

/// Repository trait for agent persistence.
///
/// `list_by_room` returns the room's roster in creation order. That order
/// is what turn rotation walks, so implementations must keep it stable.
pub trait AgentRepository: Send + Sync {
    /// Create a new agent. Returns the created agent.
    fn create(
        &self,
        agent: &Agent,
    ) -> impl std::future::Future<Output = Result<Agent, RepositoryError>> + Send;

    /// Get an agent by its unique ID.
    fn get_by_id(
        &self,
        id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Option<Agent>, RepositoryError>> + Send;

    /// List a room's agents in creation order.
    fn list_by_room(
        &self,
        room_id: &RoomId,
    ) -> impl std::future::Future<Output = Result<Vec<Agent>, RepositoryError>> + Send;

    /// Remove an agent from its room. Its past messages keep their text but
    /// lose the agent reference.
    fn delete(
        &self,
        id: &AgentId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
