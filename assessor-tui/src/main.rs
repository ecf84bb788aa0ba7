//! Assessment test authoring TUI entry point.

use assessor_core::AssessmentStore;
use assessor_tui::api_client::RestClient;
use assessor_tui::config::TuiConfig;
use assessor_tui::error::TuiError;
use assessor_tui::events::{self, Command, TuiEvent};
use assessor_tui::logging::init_tracing;
use assessor_tui::state::App;
use assessor_tui::views::render_view;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    init_tracing(&config)?;
    let store: Arc<dyn AssessmentStore> = Arc::new(RestClient::new(&config)?);
    let mut app = App::new(config);

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard {};

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);

    spawn_input_reader(event_tx.clone());
    let initial = app.start();
    dispatch(&store, initial, &event_tx);

    let tick_rate = Duration::from_millis(app.config.refresh_interval_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                let _ = app.apply_event(TuiEvent::Tick);
            }
            Some(event) = event_rx.recv() => {
                if let Some(command) = app.apply_event(event) {
                    dispatch(&store, command, &event_tx);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("Assessor TUI exiting");
    Ok(())
}

/// Run a store command off the UI loop and post its result back.
fn dispatch(store: &Arc<dyn AssessmentStore>, command: Command, sender: &mpsc::Sender<TuiEvent>) {
    tracing::debug!(command = ?command, "Dispatching store command");
    let store = Arc::clone(store);
    let sender = sender.clone();
    tokio::spawn(async move {
        let event = events::execute(store.as_ref(), command).await;
        let _ = sender.send(event).await;
    });
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}
