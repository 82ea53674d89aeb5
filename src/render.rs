//! Plain-text rendering of a match.

// Allow format! with push_str for readability
#![allow(clippy::format_push_string)]

use std::collections::BTreeMap;

use rand::Rng;

use crate::game::{CellId, Color, Match, Phase};

/// Render the board, one letter per owner.
///
/// Odd rows are indented by one column to show the hex offset. Neutral
/// cells are `.`, owned cells the owner's letter, and the cell a pulse
/// sits on the owner's letter in lowercase.
///
/// ```text
/// R . . B B .
///  . r . B .
/// R R . . b .
/// ```
#[must_use]
pub fn render_board<R: Rng>(game: &Match<R>) -> String {
    let grid = game.grid();
    let pulses: BTreeMap<CellId, Color> = game
        .pulses()
        .map(|(color, pulse)| (pulse.origin_cell, color))
        .collect();

    let mut output = String::new();
    for row in 0..grid.rows() {
        if row % 2 == 1 {
            output.push(' ');
        }
        let mut first = true;
        for col in 0..grid.columns() {
            let Some(cell) = grid.cell_at(col, row) else {
                continue;
            };
            if !first {
                output.push(' ');
            }
            first = false;
            let symbol = match (cell.owner, pulses.get(&cell.id)) {
                (_, Some(color)) => color.symbol().to_ascii_lowercase(),
                (Some(owner), None) => owner.symbol(),
                (None, None) => '.',
            };
            output.push(symbol);
        }
        output.push('\n');
    }
    output
}

/// Render a status line: phase, clock and scores.
#[must_use]
pub fn render_status<R: Rng>(game: &Match<R>) -> String {
    let clock = match game.phase() {
        Phase::Active => game
            .clock()
            .seconds_left()
            .map_or_else(String::new, |s| format!("  {s}s left")),
        Phase::Countdown => format!("  tick {}", game.countdown()),
        _ => String::new(),
    };
    format!("{:?}{clock}  {}", game.phase(), render_scores(game))
}

/// Render scores as `red:12 blue:9`, in registry order.
#[must_use]
pub fn render_scores<R: Rng>(game: &Match<R>) -> String {
    game.registry()
        .iter()
        .map(|p| format!("{}:{}", p.color, p.score()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the final ranking, one line per player.
#[must_use]
pub fn render_ranking<R: Rng>(game: &Match<R>) -> String {
    let mut output = String::new();
    for standing in game.ranking() {
        output.push_str(&format!(
            "{}. {} ({} cells)\n",
            standing.rank, standing.color, standing.score
        ));
    }
    output
}
