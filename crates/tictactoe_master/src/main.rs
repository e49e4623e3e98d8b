//! Tic-Tac-Toe Master - unified CLI

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tictactoe_master::{AppConfig, FileStore, Manifest, StatsRepository};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        Command::Play { seed, config } => {
            let config = AppConfig::load(&config.config)?;
            tictactoe_master::tui::run_tui(config, seed).await
        }
        Command::Stats { config } => {
            init_stderr_logging();
            print_stats(AppConfig::load(&config.config)?)
        }
        Command::Manifest { config } => {
            init_stderr_logging();
            print_manifest(AppConfig::load(&config.config)?)
        }
    }
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

/// Prints stored stats
#[instrument(skip_all)]
fn print_stats(config: AppConfig) -> Result<()> {
    let repository = StatsRepository::with_key(
        FileStore::new(config.stats_path().clone()),
        config.storage_key().clone(),
    );
    let stats = repository.load()?;
    info!(games_played = *stats.games_played(), "Loaded stats");

    println!("Your Wins:     {}", stats.player_wins());
    println!("Computer Wins: {}", stats.opponent_wins());
    println!("Draws:         {}", stats.draws());
    println!("Total Games:   {}", stats.games_played());
    println!("Win Rate:      {}%", stats.win_rate());
    Ok(())
}

/// Prints the mini-app manifest
#[instrument(skip_all)]
fn print_manifest(config: AppConfig) -> Result<()> {
    let manifest = Manifest::new(config.home_url());
    println!("{}", manifest.to_json()?);
    Ok(())
}
