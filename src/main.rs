//! Colhex CLI - Command-line interface for simulating and watching matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Colhex - A hexagonal territory-capture match engine
#[derive(Parser, Debug)]
#[command(name = "colhex")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a single match between computer players
    Run {
        #[command(flatten)]
        board: cli::BoardArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Print the final board
        #[arg(long)]
        show_board: bool,

        /// Print every match event
        #[arg(long)]
        events: bool,

        /// Suppress the preamble
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive TUI to watch a match in real time
    Watch {
        #[command(flatten)]
        board: cli::BoardArgs,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Milliseconds per clock tick (default: 1000)
        #[arg(long, default_value = "1000")]
        tick_ms: u64,
    },

    /// Run many matches in parallel and aggregate statistics
    Batch {
        #[command(flatten)]
        board: cli::BoardArgs,

        /// Number of matches to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each match)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            board,
            seed,
            format,
            show_board,
            events,
            quiet,
        } => cli::run::execute(&board, seed, format, show_board, events, quiet),

        Commands::Watch {
            board,
            seed,
            tick_ms,
        } => cli::watch::execute(&board, seed, tick_ms),

        Commands::Batch {
            board,
            games,
            seed,
            threads,
            format,
            progress,
        } => cli::batch::execute(&board, games, seed, threads, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
