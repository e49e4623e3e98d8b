//! Application state and logic.

use std::time::{Duration, Instant};

use tictactoe_engine::{GameStatus, Position, Snapshot};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::input::Command;
use crate::session::{GameSession, MoveReport};
use crate::share::{ShareResult, Sharer};
use crate::store::{KeyValueStore, Stats};

/// Startup phase; the board is shown once the host reports ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Splash screen.
    Loading,
    /// Game screen.
    Ready,
}

/// What the event loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing further.
    None,
    /// Run the share flow.
    Share,
    /// Exit.
    Quit,
}

/// Main application state.
pub struct App<S> {
    session: GameSession<S>,
    snapshots: watch::Receiver<Snapshot>,
    sharer: Sharer,
    phase: Phase,
    cursor: Position,
    notice: Option<String>,
    opponent_delay: Duration,
    opponent_due: Option<Instant>,
}

impl<S: KeyValueStore> App<S> {
    /// Creates the app in the loading phase.
    pub fn new(session: GameSession<S>, sharer: Sharer, opponent_delay: Duration) -> Self {
        let snapshots = session.subscribe();
        Self {
            session,
            snapshots,
            sharer,
            phase: Phase::Loading,
            cursor: Position::Center,
            notice: None,
            opponent_delay,
            opponent_due: None,
        }
    }

    /// Switches from the splash screen to the game.
    pub fn mark_ready(&mut self) {
        info!("App ready to display");
        self.phase = Phase::Ready;
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Latest published game state.
    pub fn snapshot(&self) -> Snapshot {
        *self.snapshots.borrow()
    }

    /// True once per published change since the last call.
    pub fn take_redraw(&mut self) -> bool {
        let changed = self.snapshots.has_changed().unwrap_or(false);
        if changed {
            self.snapshots.borrow_and_update();
        }
        changed
    }

    /// Current stats.
    pub fn stats(&self) -> &Stats {
        self.session.stats()
    }

    /// Cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Notice or error shown under the controls.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// When the pending opponent move fires, if one is scheduled.
    pub fn opponent_due(&self) -> Option<Instant> {
        self.opponent_due
    }

    /// Status line for the current state.
    pub fn status_message(&self) -> &'static str {
        let snapshot = self.snapshot();
        match snapshot.status {
            GameStatus::PlayerWins => "🎉 You won!",
            GameStatus::OpponentWins => "🤖 Computer wins!",
            GameStatus::Draw => "⚖️ It's a draw!",
            GameStatus::InProgress if snapshot.accepts_player_input() => "Your turn (X)",
            GameStatus::InProgress => "Computer thinking... (O)",
        }
    }

    /// Applies a command at time `now`.
    pub fn handle(&mut self, command: Command, now: Instant) -> Effect {
        if self.phase == Phase::Loading {
            return if command == Command::Quit { Effect::Quit } else { Effect::None };
        }

        match command {
            Command::Cursor(pos) => self.cursor = pos,
            Command::PlaceAtCursor => self.place(self.cursor, now),
            Command::PlaceAt(pos) => {
                self.cursor = pos;
                self.place(pos, now);
            }
            Command::NewGame => self.new_game(),
            Command::Share if self.snapshot().status.is_terminal() => return Effect::Share,
            Command::Share => debug!("Share ignored while game in progress"),
            Command::Quit => return Effect::Quit,
        }
        Effect::None
    }

    /// Fires the opponent move once its delay has passed.
    ///
    /// Returns true if the board changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.opponent_due {
            Some(due) if due <= now => {
                self.opponent_due = None;
                match self.session.opponent_move() {
                    Ok(report) => {
                        self.absorb(report);
                        true
                    }
                    Err(e) => {
                        warn!(error = %e, "Opponent move rejected");
                        false
                    }
                }
            }
            _ => false,
        }
    }

    /// Runs the share flow and shows its notice.
    pub async fn share(&mut self) {
        let Some(outcome) = self.snapshot().outcome() else {
            return;
        };
        let result = self.sharer.share(outcome, self.session.stats()).await;
        self.notice = match result {
            ShareResult::Opened(_) => None,
            other => other.notice().map(str::to_string),
        };
    }

    fn place(&mut self, pos: Position, now: Instant) {
        if !self.snapshot().accepts_player_input() {
            debug!(position = %pos, "Input ignored, not player's turn");
            return;
        }
        match self.session.player_move(pos.to_index()) {
            Ok(report) => {
                self.absorb(report);
                if !self.snapshot().status.is_terminal() {
                    self.opponent_due = Some(now + self.opponent_delay);
                    debug!(delay_ms = self.opponent_delay.as_millis() as u64, "Opponent move scheduled");
                }
            }
            Err(e) => debug!(position = %pos, error = %e, "Move rejected"),
        }
    }

    fn new_game(&mut self) {
        if self.opponent_due.take().is_some() {
            debug!("Pending opponent move cancelled");
        }
        self.session.reset();
        self.notice = None;
        self.cursor = Position::Center;
    }

    fn absorb(&mut self, report: MoveReport) {
        if let Some(e) = report.save_error {
            self.notice = Some(format!("Could not save stats: {}", e.message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StatsRepository, StoreError};
    use tictactoe_engine::{Cell, Mark, OpponentPolicy, Turn};

    /// Reads as empty; every write fails.
    #[derive(Debug, Default)]
    struct FullDisk;

    impl KeyValueStore for FullDisk {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::new("disk full"))
        }
    }

    const DELAY: Duration = Duration::from_millis(500);

    fn app() -> App<MemoryStore> {
        let session = GameSession::new(
            StatsRepository::new(MemoryStore::new()),
            OpponentPolicy::seeded(1),
        );
        let sharer = Sharer::new(None, None, "https://warpcast.com/~/compose", "http://localhost:3000");
        let mut app = App::new(session, sharer, DELAY);
        app.mark_ready();
        app
    }

    #[test]
    fn test_loading_ignores_moves() {
        let session = GameSession::new(
            StatsRepository::new(MemoryStore::new()),
            OpponentPolicy::seeded(1),
        );
        let sharer = Sharer::new(None, None, "https://warpcast.com/~/compose", "http://localhost:3000");
        let mut app = App::new(session, sharer, DELAY);
        assert_eq!(app.handle(Command::PlaceAt(Position::TopLeft), Instant::now()), Effect::None);
        assert_eq!(app.snapshot().move_count, 0);
        assert_eq!(app.handle(Command::Quit, Instant::now()), Effect::Quit);
    }

    #[test]
    fn test_opponent_waits_for_delay() {
        let mut app = app();
        let start = Instant::now();
        app.handle(Command::PlaceAt(Position::TopLeft), start);
        assert_eq!(app.status_message(), "Computer thinking... (O)");
        assert_eq!(app.opponent_due(), Some(start + DELAY));

        assert!(!app.tick(start + Duration::from_millis(100)));
        assert_eq!(app.snapshot().move_count, 1);

        assert!(app.tick(start + DELAY));
        let snapshot = app.snapshot();
        assert_eq!(snapshot.move_count, 2);
        assert_eq!(snapshot.board.get(4), Some(Cell::Marked(Mark::Opponent)));
        assert_eq!(snapshot.turn, Turn::PlayerTurn);
        assert_eq!(app.status_message(), "Your turn (X)");
    }

    #[test]
    fn test_redraw_follows_published_snapshots() {
        let mut app = app();
        assert!(!app.take_redraw());
        app.handle(Command::PlaceAt(Position::Center), Instant::now());
        assert!(app.take_redraw());
        assert!(!app.take_redraw());
        app.handle(Command::Cursor(Position::TopLeft), Instant::now());
        assert!(!app.take_redraw());
    }

    #[test]
    fn test_input_gated_while_opponent_pending() {
        let mut app = app();
        let start = Instant::now();
        app.handle(Command::PlaceAt(Position::TopLeft), start);
        app.handle(Command::PlaceAt(Position::TopRight), start);
        assert_eq!(app.snapshot().move_count, 1);
        assert!(app.snapshot().board.is_empty(2));
    }

    #[test]
    fn test_new_game_cancels_pending_move() {
        let mut app = app();
        let start = Instant::now();
        app.handle(Command::PlaceAt(Position::TopLeft), start);
        app.handle(Command::NewGame, start);
        assert_eq!(app.opponent_due(), None);
        assert!(!app.tick(start + DELAY * 2));
        assert_eq!(app.snapshot().move_count, 0);
    }

    #[test]
    fn test_share_only_when_finished() {
        let mut app = app();
        assert_eq!(app.handle(Command::Share, Instant::now()), Effect::None);
    }

    #[tokio::test]
    async fn test_finished_game_can_share() {
        let mut app = app();
        let mut now = Instant::now();
        while !app.snapshot().status.is_terminal() {
            let index = app.snapshot().board.empty_cells()[0];
            app.handle(Command::PlaceAt(Position::from_index(index).expect("index")), now);
            now += DELAY;
            app.tick(now);
        }
        assert_eq!(*app.stats().games_played(), 1);
        assert_eq!(app.handle(Command::Share, now), Effect::Share);

        app.share().await;
        let notice = app.notice().expect("manual fallback notice");
        assert!(notice.starts_with("❌ Copy this text"));
    }

    #[test]
    fn test_failed_save_shows_notice() {
        let session = GameSession::new(StatsRepository::new(FullDisk), OpponentPolicy::seeded(1));
        let sharer = Sharer::new(None, None, "https://warpcast.com/~/compose", "http://localhost:3000");
        let mut app = App::new(session, sharer, DELAY);
        app.mark_ready();

        let mut now = Instant::now();
        while !app.snapshot().status.is_terminal() {
            let index = app.snapshot().board.empty_cells()[0];
            app.handle(Command::PlaceAt(Position::from_index(index).expect("index")), now);
            now += DELAY;
            app.tick(now);
        }

        assert_eq!(*app.stats().games_played(), 1);
        let notice = app.notice().expect("save failure notice");
        assert!(notice.starts_with("Could not save stats"), "got {notice}");
        assert!(notice.contains("disk full"));
    }
}
