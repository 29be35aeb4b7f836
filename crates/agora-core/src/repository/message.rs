//! Message repository trait definition.

use agora_types::error::RepositoryError;
use agora_types::id::RoomId;
use agora_types::message::Message;

/// Repository trait for transcript persistence.
pub trait MessageRepository: Send + Sync {
    /// Persist a new message.
    fn create(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// A room's full transcript ordered by `created_at` ascending.
    fn list_by_room(
        &self,
        room_id: &RoomId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Delete every message of a room. Returns the number removed.
    fn delete_by_room(
        &self,
        room_id: &RoomId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
