pub mod loader;
pub mod stats;
pub mod version_map;

use serde::{Deserialize, Deserializer, Serialize};

pub use version_map::VersionMap;

// ---------------------------------------------------------------------------
// Domain types: the squad document as loaded from team.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    pub coach: String, // player id, the coach tag jumps to this spotlight
    #[serde(default)]
    pub tagline: Option<String>,
    pub players: Vec<Player>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub next_game: Option<NextGame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub active_version: Option<String>,
    pub versions: VersionMap,
}

/// Position tag(s). The document stores either `"GK"` or `["FIX", "ALA"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Role {
    Single(String),
    List(Vec<String>),
}

impl Role {
    pub fn tags(&self) -> Vec<&str> {
        match self {
            Role::Single(tag) => vec![tag.as_str()],
            Role::List(tags) => tags.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.tags().contains(&"GK")
    }

    pub fn label(&self) -> String {
        self.tags().join(" / ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerVersion {
    #[serde(default)]
    pub image: Option<String>,
    pub stats: PlayerStats,
}

/// Raw attributes on a 0–100 scale (skill moves on 0–5). Nothing is clamped
/// at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub pace: Option<f64>,
    pub shot: Option<f64>,
    pub pass: Option<f64>,
    pub dribbling: Option<f64>,
    pub physical: Option<f64>,
    #[serde(rename = "accuaracy", alias = "accuracy")]
    pub accuracy: Option<f64>,
    pub skillmove: Option<f64>,

    // Goalkeeper
    pub reflex: Option<f64>,
    pub handling: Option<f64>,
    pub positioning: Option<f64>,
}

impl PlayerStats {
    /// A version carrying a reflex rating is rated with the goalkeeper
    /// formula, whatever the player's role tags say.
    pub fn is_goalkeeper_version(&self) -> bool {
        self.reflex.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub team: String, // opponent
    pub date: String, // display only, never parsed
    pub our_goals: u32,
    pub their_goals: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub participants: Vec<MatchParticipant>,
}

impl Match {
    pub fn result(&self) -> MatchResult {
        if self.our_goals > self.their_goals {
            MatchResult::Win
        } else if self.our_goals < self.their_goals {
            MatchResult::Loss
        } else {
            MatchResult::Draw
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

impl MatchResult {
    pub fn label(&self) -> &'static str {
        match self {
            MatchResult::Win => "W",
            MatchResult::Loss => "L",
            MatchResult::Draw => "D",
        }
    }
}

/// A participant id that matches no roster entry is a guest, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchParticipant {
    pub id: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextGame {
    pub team: String,
    pub date: String,
    pub court: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub participants: Vec<MatchParticipant>,
}

/// An explicit `null` line-up reads the same as a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(ours: u32, theirs: u32) -> Match {
        Match {
            team: "Opp".into(),
            date: "2025-01-01".into(),
            our_goals: ours,
            their_goals: theirs,
            participants: vec![],
        }
    }

    #[test]
    fn role_parses_single_tag_and_list() {
        let single: Role = serde_json::from_str(r#""GK""#).unwrap();
        let list: Role = serde_json::from_str(r#"["FIX", "ALA"]"#).unwrap();
        assert_eq!(single, Role::Single("GK".into()));
        assert_eq!(list.tags(), vec!["FIX", "ALA"]);
        assert_eq!(list.label(), "FIX / ALA");
    }

    #[test]
    fn goalkeeper_tag_found_in_either_shape() {
        assert!(Role::Single("GK".into()).is_goalkeeper());
        assert!(Role::List(vec!["PIVOT".into(), "GK".into()]).is_goalkeeper());
        assert!(!Role::Single("ALA".into()).is_goalkeeper());
    }

    #[test]
    fn stats_read_misspelled_accuracy_key() {
        let stats: PlayerStats = serde_json::from_str(r#"{"pace": 70, "accuaracy": 81}"#).unwrap();
        assert_eq!(stats.accuracy, Some(81.0));
        assert_eq!(stats.pace, Some(70.0));
        assert!(stats.shot.is_none());
    }

    #[test]
    fn goalkeeper_version_keys_on_reflex_presence() {
        let gk: PlayerStats = serde_json::from_str(r#"{"reflex": 0}"#).unwrap();
        let outfield: PlayerStats = serde_json::from_str(r#"{"pace": 60}"#).unwrap();
        assert!(gk.is_goalkeeper_version());
        assert!(!outfield.is_goalkeeper_version());
    }

    #[test]
    fn match_without_participants_parses_empty() {
        let m: Match = serde_json::from_str(
            r#"{"team": "Opp", "date": "12 Jan", "ourGoals": 2, "theirGoals": 2}"#,
        )
        .unwrap();
        assert!(m.participants.is_empty());
        assert_eq!(m.result(), MatchResult::Draw);
    }

    #[test]
    fn null_participants_parse_empty() {
        let m: Match = serde_json::from_str(
            r#"{"team": "Opp", "date": "12 Jan", "ourGoals": 1, "theirGoals": 0, "participants": null}"#,
        )
        .unwrap();
        assert!(m.participants.is_empty());

        let next: NextGame = serde_json::from_str(
            r#"{"team": "Opp", "date": "19 Jan", "court": "2", "participants": null}"#,
        )
        .unwrap();
        assert!(next.participants.is_empty());

        let m: Match = serde_json::from_str(
            r#"{"team": "Opp", "date": "12 Jan", "ourGoals": 1, "theirGoals": 0, "participants": [{"id": "Azlan", "rating": 7.5}]}"#,
        )
        .unwrap();
        assert_eq!(m.participants, vec![MatchParticipant { id: "Azlan".into(), rating: Some(7.5) }]);
    }

    #[test]
    fn match_result_follows_score() {
        assert_eq!(game(3, 1).result(), MatchResult::Win);
        assert_eq!(game(0, 0).result(), MatchResult::Draw);
        assert_eq!(game(2, 5).result(), MatchResult::Loss);
    }
}
