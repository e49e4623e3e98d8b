//! Win/loss/draw statistics and their persistence.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tictactoe_engine::Outcome;
use tracing::{debug, info, instrument, warn};

use crate::store::{KeyValueStore, StoreError};

/// Storage key the stats record lives under.
pub const STATS_KEY: &str = "tic-tac-toe-stats";

/// Running totals across completed games.
///
/// Serialized with the same field names the browser build used, so an
/// exported record loads unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    player_wins: u32,
    #[serde(rename = "computerWins")]
    opponent_wins: u32,
    draws: u32,
    games_played: u32,
}

impl Stats {
    /// Creates stats from explicit totals.
    pub fn new(player_wins: u32, opponent_wins: u32, draws: u32, games_played: u32) -> Self {
        Self {
            player_wins,
            opponent_wins,
            draws,
            games_played,
        }
    }

    /// Returns stats with one more completed game of the given outcome.
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        match outcome {
            Outcome::PlayerWin => self.player_wins = self.player_wins.saturating_add(1),
            Outcome::OpponentWin => self.opponent_wins = self.opponent_wins.saturating_add(1),
            Outcome::Draw => self.draws = self.draws.saturating_add(1),
        }
        self.games_played = self.games_played.saturating_add(1);
        self
    }

    /// Player win rate as a whole percentage, rounded half away from zero.
    pub fn win_rate(&self) -> u32 {
        if self.games_played == 0 {
            0
        } else {
            (f64::from(self.player_wins) / f64::from(self.games_played) * 100.0).round() as u32
        }
    }
}

/// Loads and saves [`Stats`] through a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct StatsRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> StatsRepository<S> {
    /// Repository using the default key.
    pub fn new(store: S) -> Self {
        Self::with_key(store, STATS_KEY)
    }

    /// Repository using a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the stored stats.
    ///
    /// A missing or unparseable record yields zeroed stats; only storage
    /// failures are errors.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Result<Stats, StoreError> {
        let Some(raw) = self.store.get(&self.key)? else {
            debug!("No stats stored yet");
            return Ok(Stats::default());
        };
        match serde_json::from_str(&raw) {
            Ok(stats) => Ok(stats),
            Err(e) => {
                warn!(error = %e, "Stored stats unreadable, starting from zero");
                Ok(Stats::default())
            }
        }
    }

    /// Writes `stats`, replacing the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn save(&mut self, stats: &Stats) -> Result<(), StoreError> {
        let raw = serde_json::to_string(stats)?;
        self.store.set(&self.key, &raw)
    }

    /// Adds one completed game to `current` and persists the result.
    ///
    /// The updated stats come back even when saving fails, so the caller can
    /// keep showing them.
    #[instrument(skip(self, current), fields(key = %self.key))]
    pub fn record(&mut self, current: Stats, outcome: Outcome) -> (Stats, Result<(), StoreError>) {
        let updated = current.with_outcome(outcome);
        let saved = self.save(&updated);
        match &saved {
            Ok(()) => info!(
                games_played = updated.games_played,
                win_rate = updated.win_rate(),
                "Game recorded"
            ),
            Err(e) => warn!(error = %e, "Failed to persist stats"),
        }
        (updated, saved)
    }
}
