mod api;
mod app;
mod catalog;
mod config;
mod forms;
mod logging;
mod session;
mod ui;

use crate::api::client::MockApi;
use crate::api::manager::ApiManager;
use crate::api::store::Backend;
use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::route::Route;
use crate::app::state::*;
use crate::session::SessionStore;
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Load config
    let cfg = config::load_config()?;
    if let Some(path) = logging::init(&cfg.logging)? {
        info!(path = %path.display(), "logging started");
    }

    // Optional start path, e.g. `eventdeck /events/2`
    let start = std::env::args()
        .nth(1)
        .map(|path| Route::parse(&path))
        .unwrap_or_default();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, cfg, start).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        error!(error = %e, "exiting with error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
    start: Route,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    // Restore a remembered sign-in
    let session_store = SessionStore::new(&cfg.session);
    debug!(path = ?session_store.path(), "session store");
    let session = match session_store.load() {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "could not read saved session");
            None
        }
    };
    if let Some(session) = &session {
        info!(user_id = %session.user.id, "restored session");
    }

    let api = MockApi::new(Backend::seeded(), &cfg.api);
    let api_manager = ApiManager::new(api, event_tx.clone());
    let tick_ms = cfg.ui.tick_ms.max(10);
    let mut state = AppState::new(cfg, session);

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    if term_tx.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
            }
        }
    });

    // Spawn tick task
    let tick_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_millis(tick_ms));
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    let initial = handler::startup(&mut state, start);
    run_actions(&mut state, initial, &api_manager, &session_store);

    // Initial render
    terminal.draw(|f| ui::render(f, &state))?;
    state.dirty = false;

    // Main event loop
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };

        let actions = handler::handle_event(&mut state, event);
        run_actions(&mut state, actions, &api_manager, &session_store);

        if state.should_quit {
            info!("quit requested");
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    Ok(())
}

fn run_actions(
    state: &mut AppState,
    actions: Vec<Action>,
    api_manager: &ApiManager,
    session_store: &SessionStore,
) {
    for action in actions {
        match action {
            Action::Api(request) => api_manager.dispatch(request),
            Action::SaveSession(session) => {
                if let Err(e) = session_store.save(&session) {
                    warn!(error = %e, "could not save session");
                    state.toast_error(format!("Could not remember sign-in: {}", e));
                }
            }
            Action::ClearSession => {
                if let Err(e) = session_store.clear() {
                    warn!(error = %e, "could not clear session");
                }
            }
            Action::Quit => state.should_quit = true,
        }
    }
}
