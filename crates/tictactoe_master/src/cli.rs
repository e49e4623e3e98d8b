//! Command-line interface for tictactoe_master.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file.
pub const DEFAULT_CONFIG: &str = "tictactoe_master.toml";

/// Tic-Tac-Toe Master - beat the computer, share your record
#[derive(Parser, Debug)]
#[command(name = "tictactoe_master")]
#[command(about = "Play tic-tac-toe against the computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to the TOML config file (missing file means defaults)
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

impl Default for ConfigArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Seed for the opponent's random choices
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print saved stats
    Stats {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the mini-app manifest as JSON
    Manifest {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Play {
            seed: None,
            config: ConfigArgs::default(),
        }
    }
}
