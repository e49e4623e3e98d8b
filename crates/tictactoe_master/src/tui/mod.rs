//! Terminal UI for Tic-Tac-Toe Master.

mod app;
mod input;
mod ui;

pub use app::{App, Effect, Phase};
pub use input::{Command, command_for};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tictactoe_engine::OpponentPolicy;
use tracing::{debug, error, info, instrument};

use crate::config::AppConfig;
use crate::session::GameSession;
use crate::share::{Clipboard, CommandClipboard, CommandOpener, Sharer, UrlOpener};
use crate::store::{FileStore, KeyValueStore, StatsRepository};

/// Log file used while the terminal is in raw mode.
pub const LOG_FILE: &str = "tictactoe_master.log";

/// Pause before the game screen replaces the loading screen.
const STARTUP_PAUSE: Duration = Duration::from_millis(100);

/// Longest wait for a key before the loop checks its timers again.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Builds the sharer described by `config`.
pub fn sharer_from_config(config: &AppConfig) -> Sharer {
    let opener = config
        .open_command()
        .as_deref()
        .and_then(CommandOpener::from_command_line)
        .map(|o| Box::new(o) as Box<dyn UrlOpener>);
    let clipboard = config
        .clipboard_command()
        .as_deref()
        .and_then(CommandClipboard::from_command_line)
        .map(|c| Box::new(c) as Box<dyn Clipboard>);
    Sharer::new(opener, clipboard, config.compose_url(), config.home_url())
}

/// Runs the game in the terminal until the user quits.
///
/// `seed` fixes the opponent's tie-breaking for reproducible games.
pub async fn run_tui(config: AppConfig, seed: Option<u64>) -> Result<()> {
    // Keep logs off the terminal
    let log_file = std::fs::File::create(LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(seed, stats_path = %config.stats_path().display(), "Starting Tic-Tac-Toe Master TUI");

    let repository = StatsRepository::with_key(
        FileStore::new(config.stats_path().clone()),
        config.storage_key().clone(),
    );
    let policy = match seed {
        Some(seed) => OpponentPolicy::seeded(seed),
        None => OpponentPolicy::new(),
    };
    let session = GameSession::new(repository, policy);
    let mut app = App::new(session, sharer_from_config(&config), config.opponent_delay());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("TUI exited");
    res
}

#[instrument(skip_all)]
async fn run_app<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    terminal.draw(|f| ui::draw(f, app))?;
    tokio::time::sleep(STARTUP_PAUSE).await;
    app.mark_ready();

    let mut dirty = true;
    loop {
        if app.take_redraw() || dirty {
            terminal.draw(|f| ui::draw(f, app))?;
            dirty = false;
        }

        let now = Instant::now();
        let timeout = app
            .opponent_due()
            .map(|due| due.saturating_duration_since(now).min(POLL_INTERVAL))
            .unwrap_or(POLL_INTERVAL);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(command) = command_for(key.code, app.cursor()) {
                        debug!(?command, "Key command");
                        dirty = true;
                        match app.handle(command, Instant::now()) {
                            Effect::Quit => {
                                info!("User quit");
                                return Ok(());
                            }
                            Effect::Share => app.share().await,
                            Effect::None => {}
                        }
                    }
                }
                Event::Resize(..) => dirty = true,
                _ => {}
            }
        }

        if app.tick(Instant::now()) {
            debug!("Opponent moved");
        }
    }
}
