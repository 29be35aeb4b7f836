//! SQLite room repository implementation.

use agora_core::repository::room::RoomRepository;
use agora_types::error::RepositoryError;
use agora_types::id::RoomId;
use agora_types::room::Room;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `RoomRepository`.
#[derive(Clone)]
pub struct SqliteRoomRepository {
    pool: DatabasePool,
}

impl SqliteRoomRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Room.
struct RoomRow {
    id: String,
    name: String,
    scenario: String,
    created_at: String,
}

impl RoomRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            scenario: row.try_get("scenario")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_room(self) -> Result<Room, RepositoryError> {
        let id = self
            .id
            .parse::<RoomId>()
            .map_err(|e| RepositoryError::Query(format!("invalid room id: {e}")))?;

        Ok(Room {
            id,
            name: self.name,
            scenario: self.scenario,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl RoomRepository for SqliteRoomRepository {
    async fn create(&self, room: &Room) -> Result<Room, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO rooms (id, name, scenario, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(room.id.to_string())
        .bind(&room.name)
        .bind(&room.scenario)
        .bind(format_datetime(&room.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(room.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("room '{}' already exists", room.id)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM rooms WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(RoomRow::from_row(&row).map_err(query_error)?.into_room()?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Room>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM rooms ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut rooms = Vec::with_capacity(rows.len());
        for row in &rows {
            rooms.push(RoomRow::from_row(row).map_err(query_error)?.into_room()?);
        }
        Ok(rooms)
    }

    async fn delete(&self, id: &RoomId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::tests::test_pool;
    use chrono::{Duration, Utc};

    fn make_room(name: &str, scenario: &str) -> Room {
        Room {
            id: RoomId::new(),
            name: name.to_string(),
            scenario: scenario.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let repo = SqliteRoomRepository::new(test_pool().await);
        let room = make_room("UBI debate", "debate");

        repo.create(&room).await.unwrap();
        let fetched = repo.get_by_id(&room.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, room.id);
        assert_eq!(fetched.name, "UBI debate");
        assert_eq!(fetched.scenario, "debate");
        assert_eq!(
            fetched.created_at.timestamp_micros(),
            room.created_at.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let repo = SqliteRoomRepository::new(test_pool().await);
        assert!(repo.get_by_id(&RoomId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts() {
        let repo = SqliteRoomRepository::new(test_pool().await);
        let room = make_room("Once", "freeplay");
        repo.create(&room).await.unwrap();
        assert!(matches!(
            repo.create(&room).await,
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = SqliteRoomRepository::new(test_pool().await);
        let mut older = make_room("Older", "debate");
        older.created_at = Utc::now() - Duration::minutes(5);
        let newer = make_room("Newer", "story_writing");

        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = SqliteRoomRepository::new(test_pool().await);
        let room = make_room("Gone", "debate");
        repo.create(&room).await.unwrap();

        repo.delete(&room.id).await.unwrap();
        assert!(repo.get_by_id(&room.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&room.id).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
