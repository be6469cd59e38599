//! Stats resolution and aggregation over an in-memory squad.
//!
//! Everything here is a pure function of its arguments. UI selection state
//! (global version key, per-player overrides) comes in as parameters.

use crate::{Match, Player, PlayerStats, Team};
use std::collections::{BTreeSet, HashMap};

/// Version shown when neither the override nor the global key exists for a
/// player.
pub const DEFAULT_VERSION_KEY: &str = "2026";

// ---------------------------------------------------------------------------
// Version resolution
// ---------------------------------------------------------------------------

/// Pick the version key to display for `player`.
///
/// Preference: per-player override, then the global key, then
/// [`DEFAULT_VERSION_KEY`], then the player's first version in document
/// order. The returned key always exists in `player.versions`.
pub fn resolve_version<'a>(
    player: &'a Player,
    global_key: &'a str,
    overrides: &'a HashMap<String, String>,
) -> &'a str {
    let wanted = overrides
        .get(&player.id)
        .map(String::as_str)
        .filter(|key| !key.is_empty())
        .unwrap_or(global_key);

    if player.versions.contains_key(wanted) {
        return wanted;
    }
    if player.versions.contains_key(DEFAULT_VERSION_KEY) {
        return DEFAULT_VERSION_KEY;
    }
    player.versions.first_key()
}

/// Every version key used by any player, deduplicated and sorted ascending.
pub fn all_version_keys(players: &[Player]) -> Vec<String> {
    players
        .iter()
        .flat_map(|p| p.versions.keys())
        .map(ToString::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Overall rating
// ---------------------------------------------------------------------------

/// Weighted overall rating. Keys on the presence of `reflex`, never on role
/// tags. Missing attributes count as 0; rounding is half away from zero.
pub fn calculate_ovr(stats: &PlayerStats) -> i32 {
    let v = |attr: Option<f64>| attr.unwrap_or(0.0);

    if stats.is_goalkeeper_version() {
        let raw = v(stats.reflex) * 0.4
            + v(stats.handling) * 0.3
            + v(stats.positioning) * 0.2
            + v(stats.physical) * 0.1;
        return raw.round() as i32;
    }

    // skill moves are rated 0–5; stretch onto 0–100
    let skill = v(stats.skillmove).min(5.0) * 20.0;
    let raw = v(stats.pace) * 0.16
        + v(stats.shot) * 0.16
        + v(stats.pass) * 0.16
        + v(stats.dribbling) * 0.16
        + v(stats.physical) * 0.16
        + v(stats.accuracy) * 0.1
        + skill * 0.1;
    raw.round() as i32
}

// ---------------------------------------------------------------------------
// Match history aggregation
// ---------------------------------------------------------------------------

/// Appearances per id. Every roster id is present (possibly 0); guest ids
/// appear only once they have played.
pub fn compute_appearances(players: &[Player], matches: &[Match]) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> =
        players.iter().map(|p| (p.id.clone(), 0)).collect();

    for participant in matches.iter().flat_map(|m| m.participants.iter()) {
        *counts.entry(participant.id.clone()).or_insert(0) += 1;
    }
    counts
}

/// Mean match rating per id, rounded to one decimal. Unrated appearances are
/// skipped; an id with no rating at all is absent.
pub fn compute_average_ratings(matches: &[Match]) -> HashMap<String, f64> {
    let mut acc: HashMap<&str, (f64, u32)> = HashMap::new();

    for participant in matches.iter().flat_map(|m| m.participants.iter()) {
        let Some(rating) = participant.rating else {
            continue;
        };
        let entry = acc.entry(participant.id.as_str()).or_insert((0.0, 0));
        entry.0 += rating;
        entry.1 += 1;
    }

    acc.into_iter()
        .map(|(id, (sum, count))| (id.to_string(), round_one_decimal(sum / f64::from(count))))
        .collect()
}

/// Round the exact binary value to one decimal, ties away from zero.
///
/// `(value * 10.0).round()` rounds the already-rounded product instead, so an
/// average stored as 6.3499… would come out as 6.4.
fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // value = mantissa * 2^exp, exactly
    let bits = value.abs().to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exp) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    if exp >= 0 {
        return value;
    }

    let shift = exp.unsigned_abs();
    let tenths = if shift >= 64 {
        // below 2^-11, nowhere near 0.05
        0
    } else {
        let scaled = u128::from(mantissa) * 10;
        let whole = scaled >> shift;
        let rest = scaled & ((1u128 << shift) - 1);
        if rest << 1 >= 1u128 << shift { whole + 1 } else { whole }
    };

    (tenths as f64 / 10.0).copysign(value)
}

/// Squad record. Draws count towards `total_matches` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamStats {
    pub wins: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub total_matches: usize,
}

pub fn compute_team_stats(matches: &[Match]) -> TeamStats {
    let mut stats = TeamStats { total_matches: matches.len(), ..TeamStats::default() };

    for m in matches {
        stats.goals_for += m.our_goals;
        if m.our_goals > m.their_goals {
            stats.wins += 1;
        } else if m.our_goals < m.their_goals {
            stats.losses += 1;
        }
    }
    stats
}

// ---------------------------------------------------------------------------
// Lookups used by navigation
// ---------------------------------------------------------------------------

pub fn find_player_index(players: &[Player], id: &str) -> Option<usize> {
    players.iter().position(|p| p.id == id)
}

pub fn is_squad_member(players: &[Player], id: &str) -> bool {
    find_player_index(players, id).is_some()
}

// ---------------------------------------------------------------------------
// Display selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatLine {
    pub label: &'static str,
    /// Clamped to 0..=100.
    pub value: f64,
}

/// Attribute rows for the spotlight card. Unlike [`calculate_ovr`], which
/// attributes are shown follows the role tags.
pub fn displayed_attributes(player: &Player, stats: &PlayerStats) -> Vec<StatLine> {
    let rows: Vec<(&'static str, Option<f64>)> = if player.role.is_goalkeeper() {
        vec![
            ("REFLEX", stats.reflex),
            ("HANDLING", stats.handling),
            ("POSITIONING", stats.positioning),
            ("PHYSICAL", stats.physical),
        ]
    } else {
        vec![
            ("PACE", stats.pace),
            ("SHOT", stats.shot),
            ("PASS", stats.pass),
            ("DRIBBLING", stats.dribbling),
            ("PHYSICAL", stats.physical),
            ("ACCURACY", stats.accuracy),
        ]
    };

    rows.into_iter()
        .map(|(label, value)| StatLine { label, value: clamp_stat(value.unwrap_or(0.0)) })
        .collect()
}

pub fn clamp_stat(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Memoised aggregate bundle
// ---------------------------------------------------------------------------

/// The aggregate views the page renders, computed once per loaded team.
/// Rebuild it whenever a different team document is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SquadSummary {
    pub appearances: HashMap<String, u32>,
    pub average_ratings: HashMap<String, f64>,
    pub team_stats: TeamStats,
    pub version_keys: Vec<String>,
}

impl SquadSummary {
    pub fn compute(team: &Team) -> Self {
        Self {
            appearances: compute_appearances(&team.players, &team.matches),
            average_ratings: compute_average_ratings(&team.matches),
            team_stats: compute_team_stats(&team.matches),
            version_keys: all_version_keys(&team.players),
        }
    }

    pub fn appearances_for(&self, id: &str) -> u32 {
        self.appearances.get(id).copied().unwrap_or(0)
    }

    pub fn average_rating_for(&self, id: &str) -> Option<f64> {
        self.average_ratings.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchParticipant, PlayerVersion, Role, VersionMap};

    fn player(id: &str, keys: &[&str]) -> Player {
        let entries = keys
            .iter()
            .map(|k| (k.to_string(), PlayerVersion::default()))
            .collect();
        Player {
            id: id.into(),
            name: id.to_uppercase(),
            role: Role::Single("ALA".into()),
            active_version: None,
            versions: VersionMap::from_entries(entries).unwrap(),
        }
    }

    fn rated(id: &str, rating: Option<f64>) -> MatchParticipant {
        MatchParticipant { id: id.into(), rating }
    }

    fn game(ours: u32, theirs: u32, participants: Vec<MatchParticipant>) -> Match {
        Match {
            team: "Opp".into(),
            date: "2025-03-01".into(),
            our_goals: ours,
            their_goals: theirs,
            participants,
        }
    }

    #[test]
    fn missing_global_key_falls_back_to_default_year() {
        let p = player("a", &["2024", "2026"]);
        let overrides = HashMap::new();
        assert_eq!(resolve_version(&p, "2025", &overrides), "2026");
    }

    #[test]
    fn override_wins_over_global() {
        let p = player("a", &["2024", "2026"]);
        let overrides = HashMap::from([("a".to_string(), "2024".to_string())]);
        assert_eq!(resolve_version(&p, "2026", &overrides), "2024");
        assert_eq!(resolve_version(&p, "2025", &overrides), "2024");
    }

    #[test]
    fn override_for_another_player_is_ignored() {
        let p = player("a", &["2024", "2026"]);
        let overrides = HashMap::from([("b".to_string(), "2024".to_string())]);
        assert_eq!(resolve_version(&p, "2026", &overrides), "2026");
    }

    #[test]
    fn empty_override_falls_through_to_global() {
        let p = player("a", &["2024", "2026"]);
        let overrides = HashMap::from([("a".to_string(), String::new())]);
        assert_eq!(resolve_version(&p, "2024", &overrides), "2024");
    }

    #[test]
    fn unknown_override_falls_back_through_chain() {
        let p = player("a", &["2023", "2024"]);
        let overrides = HashMap::from([("a".to_string(), "1999".to_string())]);
        // neither 1999 nor 2026 exist, first key in document order wins
        assert_eq!(resolve_version(&p, "2026", &overrides), "2023");
    }

    #[test]
    fn first_key_follows_document_order_not_sort_order() {
        let p = player("a", &["legacy", "2023"]);
        assert_eq!(resolve_version(&p, "2025", &HashMap::new()), "legacy");
    }

    #[test]
    fn version_keys_are_union_sorted_and_deduplicated() {
        let players = vec![player("a", &["2026", "2024"]), player("b", &["2025", "2024"])];
        assert_eq!(all_version_keys(&players), vec!["2024", "2025", "2026"]);
        assert!(all_version_keys(&[]).is_empty());
    }

    #[test]
    fn goalkeeper_ovr() {
        let stats = PlayerStats {
            reflex: Some(80.0),
            handling: Some(70.0),
            positioning: Some(60.0),
            physical: Some(50.0),
            ..Default::default()
        };
        assert_eq!(calculate_ovr(&stats), 72);
    }

    #[test]
    fn outfield_ovr_includes_skill_moves() {
        let stats = PlayerStats {
            pace: Some(80.0),
            shot: Some(70.0),
            pass: Some(60.0),
            dribbling: Some(50.0),
            physical: Some(40.0),
            accuracy: Some(90.0),
            skillmove: Some(3.0),
            ..Default::default()
        };
        // 48 from the five even weights, 9 accuracy, 6 skill
        assert_eq!(calculate_ovr(&stats), 63);
    }

    #[test]
    fn skill_moves_cap_at_five_stars() {
        let five = PlayerStats { skillmove: Some(5.0), ..Default::default() };
        let nine = PlayerStats { skillmove: Some(9.0), ..Default::default() };
        assert_eq!(calculate_ovr(&five), 10);
        assert_eq!(calculate_ovr(&nine), 10);
    }

    #[test]
    fn missing_attributes_count_as_zero() {
        assert_eq!(calculate_ovr(&PlayerStats::default()), 0);
        // goalkeeper branch with only reflex present
        let gk = PlayerStats { reflex: Some(90.0), ..Default::default() };
        assert_eq!(calculate_ovr(&gk), 36);
    }

    #[test]
    fn ovr_ignores_outfield_attributes_on_goalkeeper_version() {
        let stats = PlayerStats {
            reflex: Some(50.0),
            handling: Some(50.0),
            positioning: Some(50.0),
            physical: Some(50.0),
            pace: Some(99.0),
            shot: Some(99.0),
            ..Default::default()
        };
        assert_eq!(calculate_ovr(&stats), 50);
    }

    #[test]
    fn ovr_rounds_half_away_from_zero() {
        // 0.16 * 50 + 0.1 * 5 = 8.5
        let stats = PlayerStats { pace: Some(50.0), accuracy: Some(5.0), ..Default::default() };
        assert_eq!(calculate_ovr(&stats), 9);
    }

    #[test]
    fn appearances_include_idle_squad_and_guests() {
        let players = vec![player("A", &["2026"]), player("B", &["2026"])];
        let matches = vec![
            game(1, 0, vec![rated("A", None), rated("C", Some(6.0))]),
            game(2, 2, vec![rated("A", Some(7.0))]),
        ];
        let apps = compute_appearances(&players, &matches);
        assert_eq!(apps.len(), 3);
        assert_eq!(apps["A"], 2);
        assert_eq!(apps["B"], 0);
        assert_eq!(apps["C"], 1);
    }

    #[test]
    fn average_ratings_skip_unrated_and_round() {
        let matches = vec![
            game(1, 0, vec![rated("A", Some(7.0)), rated("B", None), rated("G", Some(6.0))]),
            game(0, 1, vec![rated("A", Some(8.0)), rated("G", Some(6.5)), rated("G", Some(6.6))]),
        ];
        let avg = compute_average_ratings(&matches);
        assert_eq!(avg["A"], 7.5);
        assert_eq!(avg["G"], 6.4);
        assert!(!avg.contains_key("B"));
    }

    fn average_of(a: f64, b: f64) -> f64 {
        let matches = vec![game(1, 0, vec![rated("A", Some(a))]), game(1, 0, vec![rated("A", Some(b))])];
        compute_average_ratings(&matches)["A"]
    }

    #[test]
    fn average_rounds_the_stored_value_not_its_decimal_spelling() {
        // 12.7 / 2 is stored as 6.3499…, 2.3 / 2 as 1.1499…
        assert_eq!(average_of(6.3, 6.4), 6.3);
        assert_eq!(average_of(1.1, 1.2), 1.1);
        // 14.3 / 2 is stored as 7.1500…04
        assert_eq!(average_of(7.1, 7.2), 7.2);
        assert_eq!(average_of(2.4, 2.5), 2.5);
    }

    #[test]
    fn exact_ties_round_up() {
        assert_eq!(average_of(7.2, 7.3), 7.3);
        assert_eq!(average_of(8.2, 8.3), 8.3);
        assert_eq!(round_one_decimal(0.05), 0.1);
        assert_eq!(round_one_decimal(10.0), 10.0);
        assert_eq!(round_one_decimal(0.0), 0.0);
        assert_eq!(round_one_decimal(1e-30), 0.0);
    }

    #[test]
    fn team_stats_do_not_count_draws() {
        let matches = vec![game(3, 1, vec![]), game(0, 0, vec![]), game(2, 5, vec![])];
        assert_eq!(
            compute_team_stats(&matches),
            TeamStats { wins: 1, losses: 1, goals_for: 5, total_matches: 3 }
        );
        assert_eq!(compute_team_stats(&[]), TeamStats::default());
    }

    #[test]
    fn aggregation_is_repeatable() {
        let players = vec![player("A", &["2026"])];
        let matches = vec![game(2, 1, vec![rated("A", Some(7.3)), rated("Z", Some(5.0))])];
        assert_eq!(
            compute_appearances(&players, &matches),
            compute_appearances(&players, &matches)
        );
        assert_eq!(compute_average_ratings(&matches), compute_average_ratings(&matches));
        assert_eq!(compute_team_stats(&matches), compute_team_stats(&matches));
        assert_eq!(all_version_keys(&players), all_version_keys(&players));
    }

    #[test]
    fn player_lookup_misses_quietly() {
        let players = vec![player("A", &["2026"]), player("B", &["2026"])];
        assert_eq!(find_player_index(&players, "B"), Some(1));
        assert_eq!(find_player_index(&players, "nobody"), None);
        assert!(!is_squad_member(&players, "guest-7"));
    }

    #[test]
    fn displayed_attributes_follow_role_tags_and_clamp() {
        let mut keeper = player("K", &["2026"]);
        keeper.role = Role::List(vec!["GK".into()]);
        let stats = PlayerStats { reflex: Some(120.0), physical: Some(-4.0), ..Default::default() };

        let rows = displayed_attributes(&keeper, &stats);
        let labels: Vec<_> = rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["REFLEX", "HANDLING", "POSITIONING", "PHYSICAL"]);
        assert_eq!(rows[0].value, 100.0);
        assert_eq!(rows[1].value, 0.0);
        assert_eq!(rows[3].value, 0.0);

        let outfield = player("O", &["2026"]);
        assert_eq!(displayed_attributes(&outfield, &stats).len(), 6);
    }

    #[test]
    fn summary_bundles_all_views() {
        let team = Team {
            name: "SR".into(),
            coach: "A".into(),
            tagline: None,
            players: vec![player("A", &["2025"]), player("B", &["2026"])],
            matches: vec![game(4, 2, vec![rated("A", Some(8.0))])],
            next_game: None,
        };
        let summary = SquadSummary::compute(&team);
        assert_eq!(summary.appearances_for("A"), 1);
        assert_eq!(summary.appearances_for("B"), 0);
        assert_eq!(summary.appearances_for("unknown"), 0);
        assert_eq!(summary.average_rating_for("A"), Some(8.0));
        assert_eq!(summary.average_rating_for("B"), None);
        assert_eq!(summary.team_stats.wins, 1);
        assert_eq!(summary.version_keys, vec!["2025", "2026"]);
    }
}
