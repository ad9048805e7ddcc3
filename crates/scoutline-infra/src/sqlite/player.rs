//! SQLite player repository implementation.
//!
//! Implements `PlayerRepository` from `scoutline-core` using sqlx with
//! split read/write pools: raw queries, private Row structs, reader pool
//! for all statements (the pipeline never writes player rows).
//!
//! `list_missing_embedding` is a left anti-join against
//! `player_embeddings`, so a fully enriched dataset yields an empty
//! working set rather than an error.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use scoutline_core::repository::PlayerRepository;
use scoutline_types::error::RepositoryError;
use scoutline_types::player::{GameProfile, PlayerProfile};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `PlayerRepository`.
pub struct SqlitePlayerRepository {
    pool: DatabasePool,
}

impl SqlitePlayerRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Fetch players with the given base query, then attach their game
    /// profiles in one follow-up query.
    async fn fetch_players(&self, sql: &str) -> Result<Vec<PlayerProfile>, RepositoryError> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut players = Vec::with_capacity(rows.len());
        for row in &rows {
            let player_row =
                PlayerRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            players.push(player_row.into_profile()?);
        }

        if players.is_empty() {
            return Ok(players);
        }

        let mut by_player = self
            .game_profiles_for(players.iter().map(|p| p.id).collect::<Vec<_>>())
            .await?;
        for player in &mut players {
            if let Some(profiles) = by_player.remove(&player.id) {
                player.game_profiles = profiles;
            }
        }

        Ok(players)
    }

    async fn game_profiles_for(
        &self,
        ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<GameProfile>>, RepositoryError> {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT * FROM game_profiles WHERE player_id IN ({placeholders}) ORDER BY player_id, game",
        );

        let mut query = sqlx::query(&sql);
        for id in &ids {
            query = query.bind(id.to_string());
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut by_player: HashMap<Uuid, Vec<GameProfile>> = HashMap::new();
        for row in &rows {
            let profile_row =
                GameProfileRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            let profile = profile_row.into_profile()?;
            by_player.entry(profile.player_id).or_default().push(profile);
        }

        Ok(by_player)
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain PlayerProfile.
struct PlayerRow {
    id: String,
    first_name: String,
    last_name: String,
    city: Option<String>,
    state: Option<String>,
    bio: Option<String>,
    school: Option<String>,
    graduation_year: Option<i64>,
    gpa: Option<f64>,
    created_at: String,
    updated_at: String,
}

impl PlayerRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            bio: row.try_get("bio")?,
            school: row.try_get("school")?,
            graduation_year: row.try_get("graduation_year")?,
            gpa: row.try_get("gpa")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_profile(self) -> Result<PlayerProfile, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid player id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;

        Ok(PlayerProfile {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            city: self.city,
            state: self.state,
            bio: self.bio,
            school: self.school,
            graduation_year: self.graduation_year.map(|y| y as i32),
            gpa: self.gpa,
            game_profiles: Vec::new(),
            created_at,
            updated_at,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain GameProfile.
struct GameProfileRow {
    id: String,
    player_id: String,
    game: String,
    rank: Option<String>,
    role: Option<String>,
    agents: String,
    play_style: Option<String>,
}

impl GameProfileRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            player_id: row.try_get("player_id")?,
            game: row.try_get("game")?,
            rank: row.try_get("rank")?,
            role: row.try_get("role")?,
            agents: row.try_get("agents")?,
            play_style: row.try_get("play_style")?,
        })
    }

    fn into_profile(self) -> Result<GameProfile, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid game profile id: {e}")))?;
        let player_id = Uuid::parse_str(&self.player_id)
            .map_err(|e| RepositoryError::Query(format!("invalid player_id: {e}")))?;
        // A corrupt agents payload degrades to an empty list so one bad
        // sub-record cannot abort the whole selection.
        let agents: Vec<String> = match serde_json::from_str(&self.agents) {
            Ok(agents) => agents,
            Err(e) => {
                tracing::warn!(
                    game_profile = %self.id,
                    game = %self.game,
                    error = %e,
                    "unparseable agents list, treating as empty"
                );
                Vec::new()
            }
        };

        Ok(GameProfile {
            id,
            player_id,
            game: self.game,
            rank: self.rank,
            role: self.role,
            agents,
            play_style: self.play_style,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

// ---------------------------------------------------------------------------
// PlayerRepository implementation
// ---------------------------------------------------------------------------

impl PlayerRepository for SqlitePlayerRepository {
    async fn list_all(&self) -> Result<Vec<PlayerProfile>, RepositoryError> {
        self.fetch_players("SELECT * FROM players ORDER BY id").await
    }

    async fn list_missing_embedding(&self) -> Result<Vec<PlayerProfile>, RepositoryError> {
        self.fetch_players(
            r#"SELECT p.* FROM players p
               LEFT JOIN player_embeddings e ON e.player_id = p.id
               WHERE e.player_id IS NULL
               ORDER BY p.id"#,
        )
        .await
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}
