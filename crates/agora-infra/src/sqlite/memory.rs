//! SQLite-backed per-agent memory store.
//!
//! Each memory row keeps its text, the embedding vector (JSON array) and the
//! embedding model that produced it. Recall embeds the query and ranks the
//! agent's rows by cosine similarity in process; per-agent sets are small
//! (one row per reply the agent has made).

use agora_core::memory::embedder::{Embedder, cosine_similarity};
use agora_core::memory::store::MemoryStore;
use agora_types::error::MemoryError;
use agora_types::id::{AgentId, MemoryId};
use agora_types::memory::MemoryItem;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// `MemoryStore` over the `agent_memories` table.
#[derive(Clone)]
pub struct SqliteMemoryStore<E: Embedder> {
    pool: DatabasePool,
    embedder: E,
}

fn storage_error(e: impl std::fmt::Display) -> MemoryError {
    MemoryError::Storage(e.to_string())
}

impl<E: Embedder> SqliteMemoryStore<E> {
    pub fn new(pool: DatabasePool, embedder: E) -> Self {
        Self { pool, embedder }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// All memory items of an agent, newest first.
    pub async fn list_items(&self, agent_id: &AgentId) -> Result<Vec<MemoryItem>, MemoryError> {
        let rows = sqlx::query(
            "SELECT id, agent_id, content, embedding_model, created_at FROM agent_memories
             WHERE agent_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(agent_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(storage_error)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.try_get("id").map_err(storage_error)?;
            let created_at: String = row.try_get("created_at").map_err(storage_error)?;
            items.push(MemoryItem {
                id: id.parse::<MemoryId>().map_err(storage_error)?,
                agent_id: *agent_id,
                content: row.try_get("content").map_err(storage_error)?,
                embedding_model: row.try_get("embedding_model").map_err(storage_error)?,
                created_at: parse_datetime(&created_at).map_err(storage_error)?,
            });
        }
        Ok(items)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        self.embedder
            .embed(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MemoryError::Embedding("embedder returned no vectors".to_string()))
    }
}

impl<E: Embedder> MemoryStore for SqliteMemoryStore<E> {
    async fn recall(
        &self,
        agent_id: &AgentId,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<String>, MemoryError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT content, embedding FROM agent_memories WHERE agent_id = ? AND embedding_model = ?
             ORDER BY created_at ASC, id ASC",
        )
        .bind(agent_id.to_string())
        .bind(self.embedder.model_name())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(storage_error)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // A blank query has nothing to rank by; fall back to the newest items.
        if query.trim().is_empty() {
            let mut recent: Vec<String> = Vec::with_capacity(top_k);
            for row in rows.iter().rev().take(top_k) {
                recent.push(row.try_get("content").map_err(storage_error)?);
            }
            return Ok(recent);
        }

        let query_vec = self.embed_one(query).await?;

        let mut scored = Vec::with_capacity(rows.len());
        for row in &rows {
            let content: String = row.try_get("content").map_err(storage_error)?;
            let embedding: String = row.try_get("embedding").map_err(storage_error)?;
            let vector: Vec<f32> = serde_json::from_str(&embedding).map_err(storage_error)?;
            scored.push((cosine_similarity(&query_vec, &vector), content));
        }
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        debug!(agent_id = %agent_id, candidates = scored.len(), top_k, "memory recall");
        Ok(scored.into_iter().take(top_k).map(|(_, c)| c).collect())
    }

    async fn add(&self, agent_id: &AgentId, text: &str) -> Result<(), MemoryError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let vector = self.embed_one(text).await?;
        let embedding = serde_json::to_string(&vector).map_err(storage_error)?;

        sqlx::query(
            "INSERT INTO agent_memories (id, agent_id, content, embedding, embedding_model, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(MemoryId::new().to_string())
        .bind(agent_id.to_string())
        .bind(text)
        .bind(&embedding)
        .bind(self.embedder.model_name())
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn wipe(&self, agent_id: &AgentId) -> Result<u64, MemoryError> {
        let result = sqlx::query("DELETE FROM agent_memories WHERE agent_id = ?")
            .bind(agent_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(storage_error)?;
        Ok(result.rows_affected())
    }

    async fn count(&self, agent_id: &AgentId) -> Result<u64, MemoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM agent_memories WHERE agent_id = ?")
                .bind(agent_id.to_string())
                .fetch_one(&self.pool.reader)
                .await
                .map_err(storage_error)?;
        Ok(count as u64)
    }
}
