//! Deterministic profile-to-text rendering.
//!
//! [`profile_text`] flattens a [`PlayerProfile`] into the string the
//! embedding model sees. The rendering must be byte-identical across runs
//! for unchanged input: segment order is fixed, and absent fields are
//! omitted entirely rather than rendered as empty labels. Presence is
//! pattern-matched on the `Option` fields so the omission rules stay
//! exhaustive.

use scoutline_types::player::{GameProfile, PlayerProfile};

/// Render a player profile as a flat text blob for embedding.
///
/// Segments are joined with `". "` in fixed priority order: name,
/// location, bio, school, graduation year, GPA, game profiles. A profile
/// with only a name still yields a valid non-empty string.
pub fn profile_text(player: &PlayerProfile) -> String {
    let mut segments: Vec<String> = Vec::new();

    segments.push(format!("{} {}", player.first_name, player.last_name));

    match (present(&player.city), present(&player.state)) {
        (Some(city), Some(state)) => segments.push(format!("Location: {city}, {state}")),
        (Some(city), None) => segments.push(format!("Location: {city}")),
        (None, Some(state)) => segments.push(format!("Location: {state}")),
        (None, None) => {}
    }

    if let Some(bio) = present(&player.bio) {
        segments.push(format!("Bio: {bio}"));
    }
    if let Some(school) = present(&player.school) {
        segments.push(format!("School: {school}"));
    }
    if let Some(year) = player.graduation_year {
        segments.push(format!("Graduation year: {year}"));
    }
    if let Some(gpa) = player.gpa {
        segments.push(format!("GPA: {gpa}"));
    }

    let clauses: Vec<String> = player.game_profiles.iter().map(game_clause).collect();
    if !clauses.is_empty() {
        segments.push(format!("Games: {}", clauses.join("; ")));
    }

    segments.join(". ")
}

/// Render one game profile as a single comma-joined clause: game name,
/// then rank and role when present, then agents joined with `/`, then
/// play style.
fn game_clause(profile: &GameProfile) -> String {
    let mut parts: Vec<String> = vec![profile.game.clone()];

    if let Some(rank) = present(&profile.rank) {
        parts.push(rank.to_string());
    }
    if let Some(role) = present(&profile.role) {
        parts.push(role.to_string());
    }

    let agents: Vec<&str> = profile
        .agents
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if !agents.is_empty() {
        parts.push(agents.join("/"));
    }

    if let Some(style) = present(&profile.play_style) {
        parts.push(style.to_string());
    }

    parts.join(", ")
}

/// Treat `None`, empty, and whitespace-only strings all as absent.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn bare_player(first: &str, last: &str) -> PlayerProfile {
        PlayerProfile {
            id: Uuid::now_v7(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            city: None,
            state: None,
            bio: None,
            school: None,
            graduation_year: None,
            gpa: None,
            game_profiles: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn full_player() -> PlayerProfile {
        let mut player = bare_player("Sam", "Okafor");
        player.city = Some("Austin".to_string());
        player.state = Some("TX".to_string());
        player.bio = Some("Entry fragger with two years of LAN experience".to_string());
        player.school = Some("Westlake High".to_string());
        player.graduation_year = Some(2027);
        player.gpa = Some(3.8);
        player.game_profiles = vec![
            GameProfile {
                id: Uuid::now_v7(),
                player_id: player.id,
                game: "Valorant".to_string(),
                rank: Some("Immortal 2".to_string()),
                role: Some("Duelist".to_string()),
                agents: vec!["Jett".to_string(), "Raze".to_string(), "Reyna".to_string()],
                play_style: Some("aggressive entry".to_string()),
            },
            GameProfile {
                id: Uuid::now_v7(),
                player_id: player.id,
                game: "Rocket League".to_string(),
                rank: Some("Champion I".to_string()),
                role: None,
                agents: vec![],
                play_style: None,
            },
        ];
        player
    }

    #[test]
    fn test_full_profile_rendering() {
        let text = profile_text(&full_player());
        assert_eq!(
            text,
            "Sam Okafor. Location: Austin, TX. \
             Bio: Entry fragger with two years of LAN experience. \
             School: Westlake High. Graduation year: 2027. GPA: 3.8. \
             Games: Valorant, Immortal 2, Duelist, Jett/Raze/Reyna, aggressive entry; \
             Rocket League, Champion I"
        );
    }

    #[test]
    fn test_minimal_profile_is_just_the_name() {
        let text = profile_text(&bare_player("Jordan", "Reyes"));
        assert_eq!(text, "Jordan Reyes");
    }

    #[test]
    fn test_idempotent_for_unchanged_input() {
        let player = full_player();
        assert_eq!(profile_text(&player), profile_text(&player));
    }

    #[test]
    fn test_absent_fields_never_render_their_label() {
        let text = profile_text(&bare_player("Jordan", "Reyes"));
        for label in ["Location:", "Bio:", "School:", "Graduation year:", "GPA:", "Games:"] {
            assert!(!text.contains(label), "unexpected label {label:?} in {text:?}");
        }
    }

    #[test]
    fn test_empty_string_fields_treated_as_absent() {
        let mut player = bare_player("Jordan", "Reyes");
        player.bio = Some("".to_string());
        player.school = Some("   ".to_string());
        let text = profile_text(&player);
        assert_eq!(text, "Jordan Reyes");
    }

    #[test]
    fn test_partial_location() {
        let mut player = bare_player("Jordan", "Reyes");
        player.state = Some("CA".to_string());
        assert_eq!(profile_text(&player), "Jordan Reyes. Location: CA");
    }

    #[test]
    fn test_game_clause_skips_absent_parts() {
        let clause = game_clause(&GameProfile {
            id: Uuid::now_v7(),
            player_id: Uuid::now_v7(),
            game: "Overwatch 2".to_string(),
            rank: None,
            role: Some("Tank".to_string()),
            agents: vec!["Reinhardt".to_string(), "".to_string()],
            play_style: None,
        });
        assert_eq!(clause, "Overwatch 2, Tank, Reinhardt");
    }
}
