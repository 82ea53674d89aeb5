//! CLI command implementations for Colhex.

pub(crate) mod batch;
pub(crate) mod run;
pub(crate) mod watch;

mod output;

use clap::{Args, ValueEnum};
use colhex::game::{Color, MatchConfig, Participant};
use colhex::sim::{DEFAULT_FRAMES_PER_TICK, SimConfig};
use colhex::MatchError;
use std::error::Error;
use std::fmt;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `batch` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BatchFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Board and player options shared by every command.
#[derive(Args, Debug, Clone)]
pub(crate) struct BoardArgs {
    /// Player colors, comma separated (2-6 of yellow, orange, red, purple, blue, green)
    #[arg(short, long, value_delimiter = ',', default_value = "red,blue")]
    pub(crate) colors: Vec<Color>,

    /// Colors driven from the keyboard in `watch` (they stay idle elsewhere)
    #[arg(long, value_delimiter = ',')]
    pub(crate) humans: Vec<Color>,

    /// Cells on even rows
    #[arg(long, default_value = "17")]
    pub(crate) columns: u16,

    /// Number of rows
    #[arg(long, default_value = "12")]
    pub(crate) rows: u16,

    /// Starting cells per player
    #[arg(long, default_value = "12")]
    pub(crate) starting_cells: usize,

    /// Frames rendered per clock tick
    #[arg(long, default_value_t = DEFAULT_FRAMES_PER_TICK)]
    pub(crate) frames: u32,
}

impl BoardArgs {
    /// Build the simulation config these options describe.
    pub(crate) fn sim_config(&self) -> SimConfig {
        let participants = self
            .colors
            .iter()
            .map(|&color| Participant {
                color,
                is_computer: !self.humans.contains(&color),
            })
            .collect();
        SimConfig {
            match_config: MatchConfig {
                columns: self.columns,
                rows: self.rows,
                starting_cells: self.starting_cells,
                participants,
                ..MatchConfig::default()
            },
            frames_per_tick: self.frames.max(1),
        }
    }
}

/// Use the given seed, or a random one.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<MatchError> for CliError {
    fn from(e: MatchError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
