use crate::state::loader::LoadingState;
use crossterm::event::KeyEvent;
use futsal_api::Team;

#[derive(Debug, Clone)]
pub enum DataRequest {
    LoadTeam,
    ReloadTeam,
}

#[derive(Debug)]
pub enum DataResponse {
    LoadingStateChanged { loading_state: LoadingState },
    TeamLoaded { team: Team },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// One glow frame from the chant's frame clock.
    GlowFrame,
}
