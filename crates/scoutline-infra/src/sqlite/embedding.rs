//! SQLite embedding repository implementation.
//!
//! Implements `EmbeddingRepository` from `scoutline-core`. The upsert is
//! a single `INSERT .. ON CONFLICT DO UPDATE` statement, so vector,
//! source text, model, and timestamp always change together -- never a
//! partial update.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use scoutline_core::repository::EmbeddingRepository;
use scoutline_types::embedding::PlayerEmbedding;
use scoutline_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `EmbeddingRepository`.
pub struct SqliteEmbeddingRepository {
    pool: DatabasePool,
    model: String,
}

impl SqliteEmbeddingRepository {
    /// Create a new repository that stamps rows with the given model name.
    pub fn new(pool: DatabasePool, model: impl Into<String>) -> Self {
        Self {
            pool,
            model: model.into(),
        }
    }

    /// Fetch the embedding row for one player, if present.
    pub async fn get(&self, player_id: Uuid) -> Result<Option<PlayerEmbedding>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM player_embeddings WHERE player_id = ?")
            .bind(player_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| {
            let vector_json: String = row
                .try_get("vector")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let vector: Vec<f32> = serde_json::from_str(&vector_json)
                .map_err(|e| RepositoryError::Query(format!("invalid vector json: {e}")))?;
            let source_text: String = row
                .try_get("source_text")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let model: String = row
                .try_get("model")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let updated_at: String = row
                .try_get("updated_at")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let updated_at = DateTime::parse_from_rfc3339(&updated_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))?;

            Ok(PlayerEmbedding {
                player_id,
                vector,
                source_text,
                model,
                updated_at,
            })
        })
        .transpose()
    }
}

impl EmbeddingRepository for SqliteEmbeddingRepository {
    async fn upsert(
        &self,
        player_id: Uuid,
        vector: &[f32],
        source_text: &str,
    ) -> Result<(), RepositoryError> {
        let vector_json = serde_json::to_string(vector)
            .map_err(|e| RepositoryError::Query(format!("vector serialization: {e}")))?;

        sqlx::query(
            r#"INSERT INTO player_embeddings (player_id, vector, source_text, model, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(player_id) DO UPDATE SET
                   vector = excluded.vector,
                   source_text = excluded.source_text,
                   model = excluded.model,
                   updated_at = excluded.updated_at"#,
        )
        .bind(player_id.to_string())
        .bind(vector_json)
        .bind(source_text)
        .bind(&self.model)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM player_embeddings")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}
