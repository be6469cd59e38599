use crate::app::{App, MenuItem};
use crate::state::messages::DataRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    data_requests: &mpsc::Sender<DataRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit. The chant graph is closed before the terminal is restored.
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            guard.shutdown();
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Squad),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Matches),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Chant
        (_, Char(' ') | Char('p'), _) => guard.play_chant(),

        // Spotlight
        (MenuItem::Squad, Char('l') | KeyCode::Right, _) => guard.spotlight_next(),
        (MenuItem::Squad, Char('h') | KeyCode::Left, _) => guard.spotlight_prev(),
        (MenuItem::Squad, Char('g'), _) => guard.cycle_global_version(true),
        (MenuItem::Squad, Char('G'), _) => guard.cycle_global_version(false),
        (MenuItem::Squad, Char('v'), _) => guard.cycle_player_version(),
        (MenuItem::Squad, Char('V'), _) => guard.clear_player_version(),
        (_, Char('c'), _) => guard.jump_to_coach(),

        // Match list
        (MenuItem::Matches, Char('j') | KeyCode::Down, _) => guard.match_down(),
        (MenuItem::Matches, Char('k') | KeyCode::Up, _) => guard.match_up(),
        (MenuItem::Matches, KeyCode::Enter, _) => guard.toggle_match(),
        (MenuItem::Matches, Char('J'), _) => guard.participant_next(),
        (MenuItem::Matches, Char('K'), _) => guard.participant_prev(),
        (MenuItem::Matches, Char('s'), _) => guard.select_participant(),

        // Global
        (_, Char('r'), _) => {
            drop(guard);
            let _ = data_requests.send(DataRequest::ReloadTeam).await;
        }
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
