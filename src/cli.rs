//! Command-line interface for strictly_wordchain.

use clap::{Parser, Subcommand};

/// Strictly Wordchain - Korean word-chain game
#[derive(Parser, Debug)]
#[command(name = "strictly_wordchain")]
#[command(about = "Word-chain game against a dictionary-backed computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play against the computer
    Play {
        /// Path to game config (TOML). Defaults apply when the file is absent.
        #[arg(short, long, default_value = "wordchain.toml")]
        config: std::path::PathBuf,

        /// Play offline against a word list (`word<TAB>definition` per line)
        #[arg(long)]
        offline: Option<std::path::PathBuf>,

        /// Seed for the computer's choices (reproducible matches)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Practice on one device without a dictionary
    Practice {
        /// Show whose turn it is (two people sharing the device)
        #[arg(long)]
        two_player: bool,

        /// Seconds per turn
        #[arg(long, default_value = "10")]
        seconds: u32,
    },
}
