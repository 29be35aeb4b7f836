//! SQLite message repository implementation.

use agora_core::repository::message::MessageRepository;
use agora_types::error::RepositoryError;
use agora_types::id::{AgentId, MessageId, RoomId};
use agora_types::message::Message;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `MessageRepository`.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct MessageRow {
    id: String,
    room_id: String,
    agent_id: Option<String>,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            room_id: row.try_get("room_id")?,
            agent_id: row.try_get("agent_id")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let id = self
            .id
            .parse::<MessageId>()
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let room_id = self
            .room_id
            .parse::<RoomId>()
            .map_err(|e| RepositoryError::Query(format!("invalid room id: {e}")))?;
        let agent_id = self
            .agent_id
            .map(|s| s.parse::<AgentId>())
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid agent id: {e}")))?;

        Ok(Message {
            id,
            room_id,
            agent_id,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl MessageRepository for SqliteMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO messages (id, room_id, agent_id, content, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(message.room_id.to_string())
        .bind(message.agent_id.map(|id| id.to_string()))
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(message.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                Err(RepositoryError::NotFound)
            }
            Err(e) => Err(query_error(e)),
        }
    }

    async fn list_by_room(&self, room_id: &RoomId) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE room_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(room_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            messages.push(MessageRow::from_row(row).map_err(query_error)?.into_message()?);
        }
        Ok(messages)
    }

    async fn delete_by_room(&self, room_id: &RoomId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE room_id = ?")
            .bind(room_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected())
    }
}
