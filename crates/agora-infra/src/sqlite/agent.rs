//! SQLite agent repository implementation.
//!
//! Roster order is insertion order: rows carry a `created_at` stamped at
//! insert time, with the time-sortable id as tie-breaker.

use agora_core::repository::agent::AgentRepository;
use agora_types::agent::Agent;
use agora_types::error::RepositoryError;
use agora_types::id::{AgentId, RoomId};
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, query_error};

/// SQLite-backed implementation of `AgentRepository`.
#[derive(Clone)]
pub struct SqliteAgentRepository {
    pool: DatabasePool,
}

impl SqliteAgentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct AgentRow {
    id: String,
    room_id: String,
    name: String,
    role: String,
    goal: String,
}

impl AgentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            room_id: row.try_get("room_id")?,
            name: row.try_get("name")?,
            role: row.try_get("role")?,
            goal: row.try_get("goal")?,
        })
    }

    fn into_agent(self) -> Result<Agent, RepositoryError> {
        let id = self
            .id
            .parse::<AgentId>()
            .map_err(|e| RepositoryError::Query(format!("invalid agent id: {e}")))?;
        let room_id = self
            .room_id
            .parse::<RoomId>()
            .map_err(|e| RepositoryError::Query(format!("invalid room id: {e}")))?;

        Ok(Agent {
            id,
            room_id,
            name: self.name,
            role: self.role,
            goal: self.goal,
        })
    }
}

impl AgentRepository for SqliteAgentRepository {
    async fn create(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO agents (id, room_id, name, role, goal, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(agent.id.to_string())
        .bind(agent.room_id.to_string())
        .bind(&agent.name)
        .bind(&agent.role)
        .bind(&agent.goal)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(agent.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                Err(RepositoryError::NotFound)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("agent '{}' already exists", agent.id)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM agents WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(AgentRow::from_row(&row).map_err(query_error)?.into_agent()?)),
            None => Ok(None),
        }
    }

    async fn list_by_room(&self, room_id: &RoomId) -> Result<Vec<Agent>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM agents WHERE room_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(room_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut agents = Vec::with_capacity(rows.len());
        for row in &rows {
            agents.push(AgentRow::from_row(row).map_err(query_error)?.into_agent()?);
        }
        Ok(agents)
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
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
