//! Event Loop - TUI entry point and effect execution

use crate::analyze::run_analysis;
use crate::app::{AppState, Effect, Message};
use crate::backend::{HttpBackend, TriageBackend};
use crate::config::TriageConfig;
use crate::prefs::Preferences;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};
use triage_shared::TicketStore;

use super::input::{handle_key, TuiView};
use super::render::draw_ui;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Run the TUI
pub async fn run(config: &TriageConfig, prefs: Option<Preferences>) -> Result<()> {
    let backend: Arc<dyn TriageBackend> =
        Arc::new(HttpBackend::from_config(&config.backend).context("Failed to create backend client")?);
    let store = TicketStore::seeded().context("Failed to load fixture tickets")?;
    let mut app = AppState::new(config, store, prefs);
    info!(backend = %config.backend.base_url, tickets = app.store().len(), "Starting TUI");

    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!(
            "Failed to enable raw mode: {}. Ensure you're running in a real terminal (TTY).",
            e
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let result = run_event_loop(&mut terminal, &mut app, backend, tx, &mut rx).await;

    // Restore terminal (always attempt cleanup)
    let cleanup_result = restore_terminal(&mut terminal);
    result.and(cleanup_result)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    backend: Arc<dyn TriageBackend>,
    tx: mpsc::UnboundedSender<Message>,
    rx: &mut mpsc::UnboundedReceiver<Message>,
) -> Result<()> {
    let mut view = TuiView::default();

    loop {
        // Completions from spawned network jobs
        while let Ok(msg) = rx.try_recv() {
            dispatch(app, msg, &backend, &tx);
        }
        dispatch(app, Message::Tick(Instant::now()), &backend, &tx);

        terminal.draw(|f| draw_ui(f, app, &view))?;

        if app.should_quit() {
            break;
        }

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(msg) = handle_key(&mut view, app, key.code, key.modifiers) {
                        dispatch(app, msg, &backend, &tx);
                    }
                }
            }
        }
    }

    Ok(())
}

fn dispatch(
    app: &mut AppState,
    msg: Message,
    backend: &Arc<dyn TriageBackend>,
    tx: &mpsc::UnboundedSender<Message>,
) {
    if let Some(effect) = app.update(msg) {
        spawn_effect(effect, Arc::clone(backend), tx.clone());
    }
}

/// Run one effect on the runtime and report back as a message
pub fn spawn_effect(
    effect: Effect,
    backend: Arc<dyn TriageBackend>,
    tx: mpsc::UnboundedSender<Message>,
) {
    tokio::spawn(async move {
        let msg = match effect {
            Effect::Analyze(request) => {
                Message::AnalysisFinished(run_analysis(backend.as_ref(), request).await)
            }
            Effect::SendFeedback(record) => {
                Message::FeedbackFinished(backend.submit_feedback(&record).await)
            }
        };
        if tx.send(msg).is_err() {
            debug!("UI closed before effect completed");
        }
    });
}
