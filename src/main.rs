mod app;
mod chant;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::loader::{DataWorker, LoadingState};
use crate::state::messages::{DataRequest, DataResponse, UiEvent};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (data_req_tx, data_req_rx) = mpsc::channel::<DataRequest>(100);
    let (data_resp_tx, data_resp_rx) = mpsc::channel::<DataResponse>(100);

    let app = Arc::new(Mutex::new(App::new(AppSettings::load(), ui_event_tx.clone())));

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Data thread
    let data_worker = DataWorker::new(data_req_rx, data_resp_tx);
    let data_task = tokio::spawn(data_worker.run());

    // Trigger team load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app.clone(), ui_event_rx, data_req_tx, data_resp_rx).await;

    app.lock().await.shutdown();
    input_handler.abort();
    data_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("futsal-tui {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "futsal-tui - futsal squad page for the terminal

Usage:
  futsal-tui
  futsal-tui --help
  futsal-tui --version

Environment:
  FUTSAL_TEAM_JSON    Path to a team document (default: bundled squad)
  FUTSAL_CHANT_PATH   Team chant audio file (default assets/audio/chanting.mp3)
  FUTSAL_FPS          Glow frame rate, 10-144 (default 60)
  FUTSAL_LOG          Log level: off, error, warn, info, debug, trace (default error)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    data_requests: mpsc::Sender<DataRequest>,
    mut data_responses: mpsc::Receiver<DataResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &data_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = data_responses.recv() => {
                let should_redraw = handle_data_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    data_requests: &mpsc::Sender<DataRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = data_requests.send(DataRequest::LoadTeam).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, data_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::GlowFrame => app.lock().await.on_glow_frame(),
    }
}

async fn handle_data_response(
    response: DataResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        DataResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        DataResponse::TeamLoaded { team } => {
            app.lock().await.on_team_loaded(team);
        }
        DataResponse::Error { message } => {
            error!("Team load error: {message}");
            app.lock().await.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::Hide);
    let _ = execute!(stdout, terminal::EnterAlternateScreen);
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    if let Err(e) = terminal::enable_raw_mode() {
        error!("could not enable raw mode: {e}");
    }
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
