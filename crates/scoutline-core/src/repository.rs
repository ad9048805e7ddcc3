//! Repository trait definitions.
//!
//! The record selector and the upsert sink, as seen by the orchestrator.
//! Implementations live in scoutline-infra (`SqlitePlayerRepository`,
//! `SqliteEmbeddingRepository`). Uses native async fn in traits (RPITIT,
//! Rust 2024 edition).

use scoutline_types::error::RepositoryError;
use scoutline_types::player::PlayerProfile;
use uuid::Uuid;

/// Read-only access to player profiles (the record selector).
///
/// Both listing operations return players ordered by id with their game
/// profiles attached. Any error here aborts the whole run -- there is no
/// partial selection.
pub trait PlayerRepository: Send + Sync {
    /// Every player, unconditionally.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<PlayerProfile>, RepositoryError>> + Send;

    /// Players with no embedding row (left anti-join against the
    /// enrichment table). An empty result is a clean zero-work success.
    fn list_missing_embedding(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<PlayerProfile>, RepositoryError>> + Send;

    /// Total player count, for the coverage ratio.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}

/// Write access to the enrichment table (the upsert sink).
pub trait EmbeddingRepository: Send + Sync {
    /// Insert-or-update the embedding row for one player as a unit:
    /// vector, source text, model name, and timestamp together.
    ///
    /// Concurrent upserts for different ids are safe; the orchestrator
    /// never schedules the same id twice in flight.
    fn upsert(
        &self,
        player_id: Uuid,
        vector: &[f32],
        source_text: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Number of embedding rows, for the coverage ratio.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
