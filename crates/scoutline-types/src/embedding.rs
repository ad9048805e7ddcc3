//! Persisted embedding types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An enrichment row in the `player_embeddings` table, one-to-one with a
/// player.
///
/// Created on the first successful embedding for a player and overwritten
/// as a unit (vector + source text + model + timestamp) on every
/// subsequent run. Deleted only via `ON DELETE CASCADE` when the player
/// row goes away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEmbedding {
    pub player_id: Uuid,
    /// The embedding vector. Non-empty by construction: an empty vector
    /// from the provider is rejected at the client boundary.
    pub vector: Vec<f32>,
    /// The exact text the vector was computed from.
    pub source_text: String,
    /// Name of the embedding model that produced the vector.
    pub model: String,
    pub updated_at: DateTime<Utc>,
}
