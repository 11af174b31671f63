mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::{PeriodicRefresher, RefreshGuard, RefreshRequester};
use crate::state::ticker::Ticker;
use chrono::Utc;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;
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

    let settings = AppSettings::load();
    let github_login = settings.github_login.clone();

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    let app = Arc::new(Mutex::new(App::new(settings, ui_event_tx.clone())));

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(github_login, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic dashboard refresh — shares the in-flight guard with the
    // manual refresh key.
    let refresh_requester = RefreshRequester::new(RefreshGuard::default(), network_req_tx.clone());
    let refresh_ticker = PeriodicRefresher::new(refresh_requester.clone()).spawn();

    // Countdown tick — once a second until the deadline passes.
    let countdown_tx = ui_event_tx.clone();
    let countdown_ticker = Ticker::spawn(Duration::from_secs(1), move || {
        let tx = countdown_tx.clone();
        async move {
            let _ = tx.send(UiEvent::CountdownTick).await;
        }
    });

    // Trigger the initial dashboard load
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        ui_event_rx,
        network_req_tx,
        network_resp_rx,
        refresh_requester,
        countdown_ticker,
    )
    .await;

    refresh_ticker.stop();
    input_handler.abort();
    network_task.abort();

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
            println!("hackdash {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "hackdash - hackathon dashboard terminal UI

Usage:
  hackdash
  hackdash --help
  hackdash --version

Environment:
  HACKDASH_API_URL       Backend base URL (default http://localhost:8000/api)
  HACKDASH_GITHUB_LOGIN  GitHub login for team lookup (default $USER)
  HACKDASH_DEADLINE      Submission deadline, RFC 3339 (default now + 72h)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    refresh: RefreshRequester,
    countdown_ticker: Ticker,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(
                    ui_event,
                    &app,
                    &network_requests,
                    &refresh,
                    &countdown_ticker,
                )
                .await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw =
                    handle_network_response(response, &app, &refresh, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    refresh: &RefreshRequester,
    countdown_ticker: &Ticker,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            // Seed the countdown before the first tick arrives.
            let mut guard = app.lock().await;
            guard.on_countdown_tick(Utc::now());
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadDashboard).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests, refresh).await;
            true
        }
        UiEvent::Resize(_, rows) => {
            let mut guard = app.lock().await;
            guard.on_resize(rows);
            true
        }
        UiEvent::CountdownTick => {
            let mut guard = app.lock().await;
            if guard.on_countdown_tick(Utc::now()) {
                // Deadline passed; the readout freezes at "time's up".
                countdown_ticker.stop();
            }
            true
        }
        UiEvent::RotateTab => {
            let mut guard = app.lock().await;
            guard.advance_presentation_tab();
            true
        }
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    refresh: &RefreshRequester,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::DashboardLoaded { snapshot, team, challenges } => {
            let mut guard = app.lock().await;
            guard.on_dashboard_loaded(snapshot, team, challenges);
        }
        NetworkResponse::DashboardRefreshed { snapshot } => {
            let mut guard = app.lock().await;
            guard.on_dashboard_refreshed(snapshot);
            refresh.finish();
        }
        NetworkResponse::RefreshFailed { message } => {
            let mut guard = app.lock().await;
            guard.on_refresh_failed(message);
            refresh.finish();
        }
        NetworkResponse::ChallengesLoaded { challenges } => {
            let mut guard = app.lock().await;
            guard.on_challenges_loaded(challenges);
        }
        NetworkResponse::TeamSaved { team } => {
            let mut guard = app.lock().await;
            guard.on_team_saved(team);
        }
        NetworkResponse::TeamDeleted => {
            let mut guard = app.lock().await;
            guard.on_team_deleted();
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(cols, rows) => Some(UiEvent::Resize(cols, rows)),
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
    execute!(stdout, cursor::Hide).unwrap();
    execute!(stdout, terminal::EnterAlternateScreen).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    terminal::enable_raw_mode().unwrap();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0)).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    execute!(stdout, terminal::LeaveAlternateScreen).unwrap();
    execute!(stdout, cursor::Show).unwrap();
    terminal::disable_raw_mode().unwrap();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
