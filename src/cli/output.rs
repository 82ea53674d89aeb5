//! Output formatting utilities for CLI.

// Averages over game counts are display-only
#![allow(clippy::cast_precision_loss, clippy::format_push_string)]

use colhex::game::{Color, MatchEvent};
use colhex::sim::SimResult;
use serde::Serialize;

/// JSON-serializable result of the `run` command.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunResult<'a> {
    /// Match result.
    #[serde(flatten)]
    pub(super) result: &'a SimResult,
    /// Final board, one line per row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) board: Option<Vec<String>>,
    /// Every event the match emitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) events: Option<&'a [MatchEvent]>,
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &SimResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Match Result (seed: {})\n", result.seed));
    match result.winner {
        Some(winner) if result.ended_early => {
            output.push_str(&format!("  Winner: {winner} (last one standing)\n"));
        }
        Some(winner) => output.push_str(&format!("  Winner: {winner}\n")),
        None => output.push_str("  Winner: Draw\n"),
    }
    output.push_str(&format!(
        "  Played: {}s  Captures: {}\n\n",
        result.seconds_played, result.captures
    ));

    for standing in &result.ranking {
        output.push_str(&format!(
            "  {}. {:<7} {} cells\n",
            standing.rank,
            standing.color.name(),
            standing.score
        ));
    }

    output
}

/// Format one event as a log line.
pub(super) fn format_event(event: &MatchEvent) -> String {
    match event {
        MatchEvent::PhaseChanged { from, to } => format!("phase {from:?} -> {to:?}"),
        MatchEvent::Cue { tick, cue } => format!("tick {tick}: {}", cue.label()),
        MatchEvent::CellCaptured { cell, from, to } => match from {
            Some(from) => format!("{to} took cell {cell} from {from}"),
            None => format!("{to} captured cell {cell}"),
        },
        MatchEvent::PlayerEliminated { color } => format!("{color} eliminated"),
        MatchEvent::MatchEnded { ranking, early } => {
            let leader = ranking
                .first()
                .map_or_else(|| "nobody".to_string(), |s| s.color.to_string());
            if *early {
                format!("match over early, {leader} leads")
            } else {
                format!("time up, {leader} leads")
            }
        }
    }
}

/// Batch statistics for aggregated results.
#[derive(Debug, Default)]
pub(super) struct BatchStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Colors in command-line order.
    colors: Vec<Color>,
    /// Win count per color.
    pub(super) wins: Vec<u64>,
    /// Draw count.
    pub(super) draws: u64,
    /// Matches decided before time ran out.
    pub(super) early_wins: u64,
    /// Total score per color.
    total_scores: Vec<u64>,
    /// Total seconds of play across all games.
    total_seconds: u64,
    /// Total ownership changes across all games.
    total_captures: u64,
}

impl BatchStats {
    /// Create new stats for the given colors.
    pub(super) fn new(colors: &[Color]) -> Self {
        Self {
            colors: colors.to_vec(),
            wins: vec![0; colors.len()],
            total_scores: vec![0; colors.len()],
            ..Self::default()
        }
    }

    /// Add a match result to the stats.
    pub(super) fn add_result(&mut self, result: &SimResult) {
        self.games_played += 1;
        self.total_seconds += u64::from(result.seconds_played);
        self.total_captures += result.captures;
        if result.ended_early {
            self.early_wins += 1;
        }

        match result.winner.and_then(|w| self.index_of(w)) {
            Some(idx) => self.wins[idx] += 1,
            None => self.draws += 1,
        }

        for standing in &result.ranking {
            if let Some(idx) = self.index_of(standing.color) {
                self.total_scores[idx] += u64::from(standing.score);
            }
        }
    }

    /// Merge another partial result into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.early_wins += other.early_wins;
        self.total_seconds += other.total_seconds;
        self.total_captures += other.total_captures;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_scores.iter_mut().zip(&other.total_scores) {
            *a += b;
        }
    }

    fn index_of(&self, color: Color) -> Option<usize> {
        self.colors.iter().position(|&c| c == color)
    }

    /// Get win rate for a color slot (0.0-1.0).
    pub(super) fn win_rate(&self, idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Get average final score for a color slot.
    pub(super) fn avg_score(&self, idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_scores.get(idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Get average seconds of play.
    pub(super) fn avg_seconds(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_seconds as f64 / self.games_played as f64
    }

    /// Get average captures per match.
    pub(super) fn avg_captures(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_captures as f64 / self.games_played as f64
    }
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Total games played.
    games_played: u64,
    /// Per-color statistics.
    players: Vec<JsonBatchPlayer>,
    /// Number of draws.
    draws: u64,
    /// Matches decided before time ran out.
    early_wins: u64,
    /// Average seconds of play.
    avg_seconds: f64,
    /// Average captures per match.
    avg_captures: f64,
}

/// JSON-serializable per-color batch stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchPlayer {
    /// Player color.
    color: Color,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average final score.
    avg_score: f64,
}

impl JsonBatchResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &BatchStats) -> Self {
        let players = stats
            .colors
            .iter()
            .enumerate()
            .map(|(i, &color)| JsonBatchPlayer {
                color,
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_score: stats.avg_score(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            players,
            draws: stats.draws,
            early_wins: stats.early_wins,
            avg_seconds: stats.avg_seconds(),
            avg_captures: stats.avg_captures(),
        }
    }
}

/// Format batch stats as human-readable text.
pub(super) fn format_batch_text(stats: &BatchStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("Batch Results ({} games)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, color) in stats.colors.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let rate = stats.win_rate(i) * 100.0;
        output.push_str(&format!("  {:<7} {rate:.1}% ({wins} wins)\n", color.name()));
    }
    let draw_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.draws as f64 / stats.games_played as f64 * 100.0
    };
    output.push_str(&format!("  Draws:  {} ({draw_rate:.1}%)\n", stats.draws));
    output.push_str(&format!("  Early:  {}\n\n", stats.early_wins));

    output.push_str("Average Scores:\n");
    for (i, color) in stats.colors.iter().enumerate() {
        output.push_str(&format!("  {:<7} {:.1}\n", color.name(), stats.avg_score(i)));
    }

    output.push_str(&format!(
        "\nAverage Match Length: {:.1}s, {:.0} captures\n",
        stats.avg_seconds(),
        stats.avg_captures()
    ));

    output
}

/// Format batch stats as CSV.
pub(super) fn format_batch_csv(stats: &BatchStats) -> String {
    let mut output = String::new();

    output.push_str("color,wins,win_rate,avg_score\n");
    for (i, color) in stats.colors.iter().enumerate() {
        output.push_str(&format!(
            "{},{},{:.4},{:.2}\n",
            color.name(),
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_score(i)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use colhex::game::Standing;

    fn result(winner: Option<Color>, early: bool) -> SimResult {
        SimResult {
            seed: 3,
            winner,
            ranking: vec![
                Standing {
                    rank: 1,
                    color: Color::Red,
                    score: 20,
                },
                Standing {
                    rank: 2,
                    color: Color::Blue,
                    score: if early { 0 } else { 20 },
                },
            ],
            seconds_played: 31,
            captures: 40,
            ended_early: early,
        }
    }

    #[test]
    fn test_stats_merge() {
        let colors = [Color::Red, Color::Blue];
        let mut a = BatchStats::new(&colors);
        a.add_result(&result(Some(Color::Red), true));
        let mut b = BatchStats::new(&colors);
        b.add_result(&result(None, false));

        a.merge(&b);
        assert_eq!(a.games_played, 2);
        assert_eq!(a.wins, vec![1, 0]);
        assert_eq!(a.draws, 1);
        assert_eq!(a.early_wins, 1);
        assert!((a.win_rate(0) - 0.5).abs() < 1e-12);
        assert!((a.avg_score(1) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_csv_has_row_per_color() {
        let mut stats = BatchStats::new(&[Color::Red, Color::Blue]);
        stats.add_result(&result(Some(Color::Red), true));
        let csv = format_batch_csv(&stats);
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains("red,1,1.0000,20.00"));
    }

    #[test]
    fn test_text_mentions_draw() {
        let text = format_text(&result(None, false));
        assert!(text.contains("Draw"));
        assert!(text.contains("seed: 3"));
    }
}
