//! Player profile types.
//!
//! A `PlayerProfile` is the source record the enrichment pipeline reads.
//! All recruiting-facing fields beyond the name are optional: players fill
//! profiles out incrementally, so absence is the norm, not an error. The
//! pipeline never writes these rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player profile as stored in the `players` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Free-text bio written by the player.
    pub bio: Option<String>,
    pub school: Option<String>,
    pub graduation_year: Option<i32>,
    pub gpa: Option<f64>,
    /// Per-game competitive profiles, zero or more.
    pub game_profiles: Vec<GameProfile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerProfile {
    /// Human-readable name used in logs and failure reports.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A per-game competitive profile nested under a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameProfile {
    pub id: Uuid,
    pub player_id: Uuid,
    /// Game title (e.g., "Valorant", "Rocket League").
    pub game: String,
    /// Competitive rank within the game (e.g., "Immortal 2").
    pub rank: Option<String>,
    /// In-game role (e.g., "Duelist", "IGL").
    pub role: Option<String>,
    /// Agents/characters played, in preference order.
    pub agents: Vec<String>,
    /// Self-described play style.
    pub play_style: Option<String>,
}
