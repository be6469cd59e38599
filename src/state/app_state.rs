use crate::app::MenuItem;
use chrono::{DateTime, Local};
use futsal_api::stats::{self, DEFAULT_VERSION_KEY, SquadSummary};
use futsal_api::{Match, Player, Team};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Loaded squad
// ---------------------------------------------------------------------------

/// The team document plus its aggregates, computed once per load.
#[derive(Debug)]
pub struct SquadState {
    pub team: Team,
    pub summary: SquadSummary,
    pub loaded_at: DateTime<Local>,
}

impl SquadState {
    pub fn new(team: Team) -> Self {
        let summary = SquadSummary::compute(&team);
        Self { team, summary, loaded_at: Local::now() }
    }
}

// ---------------------------------------------------------------------------
// Player spotlight
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SpotlightState {
    pub index: usize,
    pub global_version: String,
    /// Player id → version key picked for that player alone.
    pub overrides: HashMap<String, String>,
}

impl Default for SpotlightState {
    fn default() -> Self {
        Self {
            index: 0,
            global_version: DEFAULT_VERSION_KEY.to_string(),
            overrides: HashMap::new(),
        }
    }
}

impl SpotlightState {
    pub fn next(&mut self, roster_len: usize) {
        if roster_len == 0 {
            return;
        }
        self.index = (self.index + 1) % roster_len;
    }

    pub fn prev(&mut self, roster_len: usize) {
        if roster_len == 0 {
            return;
        }
        self.index = (self.index + roster_len - 1) % roster_len;
    }

    /// Clamp after a reload that may have shortened the roster.
    pub fn clamp(&mut self, roster_len: usize) {
        if self.index >= roster_len {
            self.index = 0;
        }
    }

    pub fn current<'a>(&self, players: &'a [Player]) -> Option<&'a Player> {
        players.get(self.index)
    }

    /// Move the spotlight to `id`. Unknown ids are ignored.
    pub fn jump_to(&mut self, players: &[Player], id: &str) -> bool {
        match stats::find_player_index(players, id) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }

    /// Step the global version through `keys` (sorted union of all keys).
    /// A global key outside the list restarts from the first key.
    pub fn cycle_global(&mut self, keys: &[String], forward: bool) {
        if let Some(next) = cycle(keys.iter().map(String::as_str), &self.global_version, forward) {
            self.global_version = next.to_string();
        }
    }

    /// Step the current player's override through that player's own keys,
    /// starting from whatever is on screen now.
    pub fn cycle_player_version(&mut self, players: &[Player]) {
        let Some(player) = self.current(players) else {
            return;
        };
        let shown = self
            .overrides
            .get(&player.id)
            .filter(|k| player.versions.contains_key(k))
            .cloned()
            .unwrap_or_else(|| {
                stats::resolve_version(player, &self.global_version, &self.overrides).to_string()
            });

        if let Some(next) = cycle(player.versions.keys(), &shown, true) {
            self.overrides.insert(player.id.clone(), next.to_string());
        }
    }

    pub fn clear_override(&mut self, players: &[Player]) {
        if let Some(player) = self.current(players) {
            self.overrides.remove(&player.id);
        }
    }

    pub fn resolved_version<'a>(&'a self, player: &'a Player) -> &'a str {
        stats::resolve_version(player, &self.global_version, &self.overrides)
    }

    pub fn has_override(&self, player: &Player) -> bool {
        self.overrides.get(&player.id).is_some_and(|k| !k.is_empty())
    }
}

fn cycle<'a>(keys: impl Iterator<Item = &'a str>, current: &str, forward: bool) -> Option<&'a str> {
    let keys: Vec<&str> = keys.collect();
    if keys.is_empty() {
        return None;
    }
    let next = match keys.iter().position(|k| *k == current) {
        Some(i) if forward => (i + 1) % keys.len(),
        Some(i) => (i + keys.len() - 1) % keys.len(),
        None => 0,
    };
    Some(keys[next])
}

// ---------------------------------------------------------------------------
// Match list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchListState {
    pub selected: usize,
    /// At most one match row is open at a time.
    pub expanded: Option<usize>,
    /// Cursor over the participants of the expanded match.
    pub participant: usize,
}

impl MatchListState {
    pub fn down(&mut self, match_count: usize) {
        if self.selected + 1 < match_count {
            self.selected += 1;
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Open the selected row, or close it if it is already the open one.
    pub fn toggle(&mut self) {
        self.expanded = if self.expanded == Some(self.selected) {
            None
        } else {
            Some(self.selected)
        };
        self.participant = 0;
    }

    pub fn participant_next(&mut self, matches: &[Match]) {
        let count = self.expanded_participants(matches);
        if self.participant + 1 < count {
            self.participant += 1;
        }
    }

    pub fn participant_prev(&mut self) {
        self.participant = self.participant.saturating_sub(1);
    }

    /// Participant id under the cursor in the open match.
    pub fn selected_participant<'a>(&self, matches: &'a [Match]) -> Option<&'a str> {
        let m = matches.get(self.expanded?)?;
        m.participants.get(self.participant).map(|p| p.id.as_str())
    }

    pub fn clamp(&mut self, match_count: usize) {
        if self.selected >= match_count {
            self.selected = match_count.saturating_sub(1);
        }
        if self.expanded.is_some_and(|i| i >= match_count) {
            self.expanded = None;
            self.participant = 0;
        }
    }

    fn expanded_participants(&self, matches: &[Match]) -> usize {
        self.expanded
            .and_then(|i| matches.get(i))
            .map_or(0, |m| m.participants.len())
    }
}

// ---------------------------------------------------------------------------
// Root UI state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub squad: Option<SquadState>,
    pub spotlight: SpotlightState,
    pub matches: MatchListState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &[Player] {
        self.squad.as_ref().map(|s| s.team.players.as_slice()).unwrap_or(&[])
    }

    pub fn match_history(&self) -> &[Match] {
        self.squad.as_ref().map(|s| s.team.matches.as_slice()).unwrap_or(&[])
    }
}
