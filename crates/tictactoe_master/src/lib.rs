//! Tic-Tac-Toe Master: play against a scripted opponent in the terminal.
//!
//! The rules and the opponent live in [`tictactoe_engine`]. This crate adds
//! the host around them.
//!
//! # Architecture
//!
//! - **Session**: one game at a time, publishing snapshots on a watch channel
//! - **Store**: win/loss/draw stats behind a key-value capability
//! - **Share**: post text, composer links and the clipboard fallback
//! - **TUI**: ratatui front end that schedules the opponent's delayed move
//! - **Manifest**: the mini-app listing document
//!
//! # Example
//!
//! ```
//! use tictactoe_master::{GameSession, MemoryStore, StatsRepository};
//! use tictactoe_engine::OpponentPolicy;
//!
//! let mut session = GameSession::new(
//!     StatsRepository::new(MemoryStore::new()),
//!     OpponentPolicy::seeded(7),
//! );
//! session.player_move(4).unwrap();
//! session.opponent_move().unwrap();
//! assert_eq!(session.snapshot().move_count, 2);
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(test), forbid(unsafe_code))]

mod config;
mod manifest;
mod session;
mod share;
mod store;
pub mod tui;

pub use config::{AppConfig, ConfigError, HOME_URL_ENV};
pub use manifest::{AccountAssociation, Manifest, MiniAppInfo};
pub use session::{GameSession, MoveReport};
pub use share::{
    Clipboard, CommandClipboard, CommandOpener, ShareError, ShareMessage, ShareResult, Sharer,
    UrlOpener,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, STATS_KEY, Stats, StatsRepository, StoreError};
