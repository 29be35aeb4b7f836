//! Room repository trait definition.

use agora_types::error::RepositoryError;
use agora_types::id::RoomId;
use agora_types::room::Room;

/// Repository trait for room persistence.
///
/// Implementations live in agora-infra (e.g., `SqliteRoomRepository`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait RoomRepository: Send + Sync {
    /// Create a new room. Returns the created room.
    fn create(
        &self,
        room: &Room,
    ) -> impl std::future::Future<Output = Result<Room, RepositoryError>> + Send;

    /// Get a room by its unique ID.
    fn get_by_id(
        &self,
        id: &RoomId,
    ) -> impl std::future::Future<Output = Result<Option<Room>, RepositoryError>> + Send;

    /// List all rooms, newest first.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Room>, RepositoryError>> + Send;

    /// Permanently delete a room together with its agents and messages.
    fn delete(
        &self,
        id: &RoomId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
