//! Strictly Wordchain - Unified CLI
//!
//! Word-chain game in the terminal, against the computer or in practice mode.

#![warn(missing_docs)]

mod cli;
mod console;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::sync::Arc;
use strictly_wordchain::{
    DictionaryGateway, GameConfig, MatchEngine, MatchSession, MemoryDictionary, OpenDictGateway,
    RandomPicker,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging()?;

    match cli.command {
        Command::Play {
            config,
            offline,
            seed,
        } => run_play(config, offline, seed).await,
        Command::Practice {
            two_player,
            seconds,
        } => console::run_practice(seconds, two_player).await,
    }
}

/// Logs to a file so output does not interleave with the game.
fn init_logging() -> Result<()> {
    let log_file = std::fs::File::create("strictly_wordchain.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Run a match against the computer
async fn run_play(config_path: PathBuf, offline: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let config = if config_path.exists() {
        GameConfig::from_file(&config_path)?
    } else {
        warn!(path = %config_path.display(), "Config file not found, using defaults");
        GameConfig::default()
    };

    let gateway: Arc<dyn DictionaryGateway> = match offline {
        Some(path) => {
            let limit = *config.candidate_limit() as usize;
            let dictionary = MemoryDictionary::from_file(&path, limit)
                .with_context(|| format!("Failed to load word list {}", path.display()))?;
            info!(words = dictionary.len(), "Playing offline");
            Arc::new(dictionary)
        }
        None => Arc::new(OpenDictGateway::new(config.gateway_config()?)?),
    };

    let picker = match seed {
        Some(seed) => RandomPicker::seeded(seed),
        None => RandomPicker::from_entropy(),
    };

    let engine = MatchEngine::with_picker(*config.turn_seconds(), picker);
    let handle = MatchSession::new(engine, gateway).spawn();
    console::run_match(handle).await
}
