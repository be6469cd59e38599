use crate::Team;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

pub type LoadResult<T> = Result<T, LoadError>;

pub const TEAM_JSON_ENV: &str = "FUTSAL_TEAM_JSON";
const EMBEDDED_TEAM_JSON: &str = include_str!("../team.json");

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error, String),
    Parsing(serde_json::Error, String),
    Invalid(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e, source) => write!(f, "could not read {source}: {e}"),
            LoadError::Parsing(e, source) => write!(f, "invalid team json in {source}: {e}"),
            LoadError::Invalid(msg) => write!(f, "invalid team document: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e, _) => Some(e),
            LoadError::Parsing(e, _) => Some(e),
            LoadError::Invalid(_) => None,
        }
    }
}

/// Load the squad document.
///
/// Fallback chain:
/// 1) `FUTSAL_TEAM_JSON` env var, a local team document. Read or parse
///    failures are reported, never papered over with the embedded squad.
/// 2) Embedded `team.json` compiled into the binary.
pub fn load_team() -> LoadResult<Team> {
    if let Ok(path) = std::env::var(TEAM_JSON_ENV)
        && !path.trim().is_empty()
    {
        return load_team_file(Path::new(path.trim()));
    }
    load_embedded_team()
}

pub fn load_team_file(path: &Path) -> LoadResult<Team> {
    let source = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io(e, source.clone()))?;
    parse_team(&content, &source)
}

pub fn load_embedded_team() -> LoadResult<Team> {
    parse_team(EMBEDDED_TEAM_JSON, "embedded team.json")
}

pub fn parse_team(content: &str, source: &str) -> LoadResult<Team> {
    let team: Team =
        serde_json::from_str(content).map_err(|e| LoadError::Parsing(e, source.to_owned()))?;
    validate(&team)?;
    Ok(team)
}

/// Roster invariants serde cannot express. Non-empty versions are already
/// enforced by `VersionMap`.
fn validate(team: &Team) -> LoadResult<()> {
    let mut seen = HashSet::new();
    for player in &team.players {
        if player.id.trim().is_empty() {
            return Err(LoadError::Invalid(format!("player {:?} has an empty id", player.name)));
        }
        if !seen.insert(player.id.as_str()) {
            return Err(LoadError::Invalid(format!("duplicate player id {:?}", player.id)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{SquadSummary, resolve_version};
    use std::collections::HashMap;

    #[test]
    fn embedded_team_parses() {
        let team = load_embedded_team().expect("embedded squad should parse");
        assert!(!team.players.is_empty());
        assert!(!team.matches.is_empty());
        assert!(
            team.players.iter().any(|p| p.id == team.coach),
            "coach should be on the roster"
        );
    }

    #[test]
    fn embedded_team_has_guests_and_goalkeeper() {
        let team = load_embedded_team().unwrap();
        let summary = SquadSummary::compute(&team);
        let guests = summary
            .appearances
            .keys()
            .filter(|id| !team.players.iter().any(|p| &p.id == *id))
            .count();
        assert!(guests > 0, "sample data should exercise guest participants");
        assert!(team.players.iter().any(|p| p.role.is_goalkeeper()));
    }

    #[test]
    fn every_embedded_player_resolves_a_version() {
        let team = load_embedded_team().unwrap();
        let overrides = HashMap::new();
        for player in &team.players {
            let key = resolve_version(player, "2026", &overrides);
            assert!(player.versions.contains_key(key), "{} -> {key}", player.id);
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let raw = r#"{
            "name": "SR", "coach": "a",
            "players": [
                {"id": "a", "name": "A", "role": "GK", "versions": {"2026": {"stats": {}}}},
                {"id": "a", "name": "B", "role": "ALA", "versions": {"2026": {"stats": {}}}}
            ]
        }"#;
        let err = parse_team(raw, "test").unwrap_err();
        assert!(matches!(err, LoadError::Invalid(_)), "{err}");
    }

    #[test]
    fn player_without_versions_is_rejected() {
        let raw = r#"{
            "name": "SR", "coach": "a",
            "players": [{"id": "a", "name": "A", "role": "GK", "versions": {}}]
        }"#;
        let err = parse_team(raw, "test").unwrap_err();
        assert!(matches!(err, LoadError::Parsing(_, _)), "{err}");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_team_file(Path::new("/definitely/not/here/team.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/team.json"));
    }
}
