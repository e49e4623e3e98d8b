//! Game session: engine, opponent and stats wired together.
//!
//! The session is the only owner of the active game. Each change publishes
//! a fresh [`Snapshot`] on a watch channel so any number of views can redraw.

use derive_new::new;
use tictactoe_engine::{EngineError, Game, Mark, OpponentPolicy, Snapshot};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::store::{KeyValueStore, Stats, StatsRepository, StoreError};

/// What a successful move produced.
#[derive(Debug, new)]
pub struct MoveReport {
    /// State after the move.
    pub snapshot: Snapshot,
    /// Present when the move ended the game and saving stats failed.
    pub save_error: Option<StoreError>,
}

/// A single player's game against the scripted opponent.
#[derive(Debug)]
pub struct GameSession<S> {
    game: Game,
    policy: OpponentPolicy,
    repository: StatsRepository<S>,
    stats: Stats,
    recorded: bool,
    snapshots: watch::Sender<Snapshot>,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Starts a session, loading stats from `repository`.
    ///
    /// Unreadable storage is logged and treated as zeroed stats.
    #[instrument(skip_all)]
    pub fn new(repository: StatsRepository<S>, policy: OpponentPolicy) -> Self {
        let stats = repository.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load stats, starting from zero");
            Stats::default()
        });
        let game = Game::new();
        let (snapshots, _) = watch::channel(game.snapshot());
        info!(games_played = *stats.games_played(), "Session started");

        Self {
            game,
            policy,
            repository,
            stats,
            recorded: false,
            snapshots,
        }
    }

    /// Subscribes to state snapshots. The receiver starts at the current one.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Current state.
    pub fn snapshot(&self) -> Snapshot {
        self.game.snapshot()
    }

    /// Stats including any game just finished.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Returns the stats repository.
    pub fn repository(&self) -> &StatsRepository<S> {
        &self.repository
    }

    /// Places the player's mark at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMove`] when it is not the player's turn
    /// or the cell is unavailable. Nothing changes on error.
    #[instrument(skip(self))]
    pub fn player_move(&mut self, index: usize) -> Result<MoveReport, EngineError> {
        let snapshot = self.game.play(index, Mark::Player)?;
        Ok(self.after_move(snapshot))
    }

    /// Lets the opponent move.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when it is not the opponent's turn or the
    /// game is over. Nothing changes on error.
    #[instrument(skip(self))]
    pub fn opponent_move(&mut self) -> Result<MoveReport, EngineError> {
        let snapshot = self.game.play_opponent(&mut self.policy)?;
        Ok(self.after_move(snapshot))
    }

    /// Throws away the current game and starts a new one, player first.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Snapshot {
        let snapshot = self.game.reset();
        self.recorded = false;
        self.publish(snapshot);
        snapshot
    }

    fn after_move(&mut self, snapshot: Snapshot) -> MoveReport {
        let mut save_error = None;
        if let Some(outcome) = snapshot.outcome()
            && !self.recorded
        {
            let (stats, saved) = self.repository.record(self.stats, outcome);
            self.stats = stats;
            self.recorded = true;
            save_error = saved.err();
            info!(%outcome, moves = snapshot.move_count, "Game finished");
        }
        self.publish(snapshot);
        MoveReport::new(snapshot, save_error)
    }

    fn publish(&self, snapshot: Snapshot) {
        // Succeeds even with no receivers.
        self.snapshots.send_replace(snapshot);
        debug!(move_count = snapshot.move_count, status = ?snapshot.status, "Snapshot published");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tictactoe_engine::{GameStatus, Turn};

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

    fn session() -> GameSession<MemoryStore> {
        GameSession::new(StatsRepository::new(MemoryStore::new()), OpponentPolicy::seeded(3))
    }

    #[test]
    fn test_subscribers_see_each_move() {
        let mut session = session();
        let rx = session.subscribe();
        session.player_move(0).expect("valid");
        assert_eq!(rx.borrow().turn, Turn::OpponentTurn);
        session.opponent_move().expect("valid");
        assert_eq!(rx.borrow().move_count, 2);
        session.reset();
        assert_eq!(rx.borrow().move_count, 0);
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut session = session();
        let rx = session.subscribe();
        session.player_move(4).expect("valid");
        assert!(session.player_move(5).is_err());
        assert_eq!(rx.borrow().move_count, 1);
    }

    #[test]
    fn test_outcome_recorded_once() {
        let mut session = session();
        while !session.snapshot().status.is_terminal() {
            let snapshot = session.snapshot();
            if snapshot.turn == Turn::PlayerTurn {
                let index = snapshot.board.empty_cells()[0];
                session.player_move(index).expect("empty cell");
            } else {
                session.opponent_move().expect("opponent turn");
            }
        }
        assert_eq!(*session.stats().games_played(), 1);
        assert!(session.player_move(0).is_err());
        assert_eq!(*session.stats().games_played(), 1);
        assert_eq!(session.repository().load().expect("load"), *session.stats());

        session.reset();
        assert_eq!(session.snapshot().status, GameStatus::InProgress);
        assert_eq!(*session.stats().games_played(), 1);
    }

    #[test]
    fn test_failed_save_still_counts_game() {
        let mut session = GameSession::new(StatsRepository::new(FullDisk), OpponentPolicy::seeded(3));
        let mut last = None;
        while !session.snapshot().status.is_terminal() {
            let snapshot = session.snapshot();
            let report = if snapshot.turn == Turn::PlayerTurn {
                session.player_move(snapshot.board.empty_cells()[0]).expect("empty cell")
            } else {
                session.opponent_move().expect("opponent turn")
            };
            last = Some(report);
        }

        let report = last.expect("at least one move");
        let error = report.save_error.expect("save should fail");
        assert_eq!(error.message, "disk full");
        assert_eq!(*session.stats().games_played(), 1);
    }
}
