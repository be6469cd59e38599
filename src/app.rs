use crate::chant::{ChantPlayer, CpalGraphSource};
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, SquadState};
use crate::state::frame_clock::TokioFrames;
use crate::state::messages::UiEvent;
use futsal_api::Team;
use futsal_api::stats;
use log::{debug, info};
use tokio::sync::mpsc;

pub type Chant = ChantPlayer<CpalGraphSource, TokioFrames>;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Squad,
    Matches,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub chant: Chant,
}

impl App {
    pub fn new(settings: AppSettings, ui_events: mpsc::Sender<UiEvent>) -> Self {
        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        let chant = ChantPlayer::new(
            CpalGraphSource::new(settings.chant_path.clone()),
            TokioFrames::new(ui_events, settings.fps),
        );

        Self { state: AppState::new(), settings, chant }
    }

    // -----------------------------------------------------------------------
    // Data responses, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_team_loaded(&mut self, team: Team) {
        info!("{} loaded: {} players, {} matches", team.name, team.players.len(), team.matches.len());
        self.state.last_error = None;

        let squad = SquadState::new(team);
        self.state.spotlight.clamp(squad.team.players.len());
        self.state.matches.clamp(squad.team.matches.len());
        self.state.squad = Some(squad);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Spotlight
    // -----------------------------------------------------------------------

    pub fn spotlight_next(&mut self) {
        let len = self.state.players().len();
        self.state.spotlight.next(len);
    }

    pub fn spotlight_prev(&mut self) {
        let len = self.state.players().len();
        self.state.spotlight.prev(len);
    }

    pub fn cycle_global_version(&mut self, forward: bool) {
        let Some(squad) = self.state.squad.as_ref() else {
            return;
        };
        self.state.spotlight.cycle_global(&squad.summary.version_keys, forward);
        debug!("global version -> {}", self.state.spotlight.global_version);
    }

    pub fn cycle_player_version(&mut self) {
        let Some(squad) = self.state.squad.as_ref() else {
            return;
        };
        self.state.spotlight.cycle_player_version(&squad.team.players);
    }

    pub fn clear_player_version(&mut self) {
        let Some(squad) = self.state.squad.as_ref() else {
            return;
        };
        self.state.spotlight.clear_override(&squad.team.players);
    }

    /// Show `id` in the spotlight. Guests and unknown ids are ignored.
    pub fn jump_to_player(&mut self, id: &str) {
        let Some(squad) = self.state.squad.as_ref() else {
            return;
        };
        if self.state.spotlight.jump_to(&squad.team.players, id) {
            self.update_tab(MenuItem::Squad);
        }
    }

    pub fn jump_to_coach(&mut self) {
        let Some(coach) = self.state.squad.as_ref().map(|s| s.team.coach.clone()) else {
            return;
        };
        self.jump_to_player(&coach);
    }

    // -----------------------------------------------------------------------
    // Match list
    // -----------------------------------------------------------------------

    pub fn match_down(&mut self) {
        let count = self.state.match_history().len();
        self.state.matches.down(count);
    }

    pub fn match_up(&mut self) {
        self.state.matches.up();
    }

    pub fn toggle_match(&mut self) {
        if !self.state.match_history().is_empty() {
            self.state.matches.toggle();
        }
    }

    pub fn participant_next(&mut self) {
        let Some(squad) = self.state.squad.as_ref() else {
            return;
        };
        self.state.matches.participant_next(&squad.team.matches);
    }

    pub fn participant_prev(&mut self) {
        self.state.matches.participant_prev();
    }

    pub fn select_participant(&mut self) {
        let Some(id) = self
            .state
            .matches
            .selected_participant(self.state.match_history())
            .map(ToString::to_string)
        else {
            return;
        };
        if stats::is_squad_member(self.state.players(), &id) {
            self.jump_to_player(&id);
        } else {
            debug!("{id} is a guest, nothing to show");
        }
    }

    // -----------------------------------------------------------------------
    // Chant
    // -----------------------------------------------------------------------

    pub fn play_chant(&mut self) {
        self.chant.start();
    }

    /// Returns whether the glow changed and needs a redraw.
    pub fn on_glow_frame(&mut self) -> bool {
        self.chant.on_frame()
    }

    pub fn shutdown(&mut self) {
        self.chant.dispose();
    }
}
