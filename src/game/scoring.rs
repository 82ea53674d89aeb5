//! Elimination bookkeeping and final ranking.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::game::{Color, ContactOutcome, PlayerRegistry};

/// One line of the final ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// 1-based position.
    pub rank: usize,
    /// Player color.
    pub color: Color,
    /// Final score.
    pub score: u32,
}

/// Tracks which players are currently at zero score.
///
/// Seeded from the registry at setup; afterwards the count only changes
/// through [`Scoreboard::record`], fed with the outcome of every resolved
/// contact.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    total_players: usize,
    at_zero: BTreeSet<Color>,
}

impl Scoreboard {
    /// Create a scoreboard for a match with `total_players` participants.
    #[must_use]
    pub const fn new(total_players: usize) -> Self {
        Self {
            total_players,
            at_zero: BTreeSet::new(),
        }
    }

    /// Create a scoreboard for every player in `registry`, counting those
    /// already at zero.
    #[must_use]
    pub fn from_registry(registry: &PlayerRegistry) -> Self {
        Self {
            total_players: registry.len(),
            at_zero: registry
                .iter()
                .filter(|p| p.score() == 0)
                .map(|p| p.color)
                .collect(),
        }
    }

    /// Number of players currently at zero score.
    #[must_use]
    pub fn zero_score_count(&self) -> usize {
        self.at_zero.len()
    }

    /// Whether a player is currently at zero score.
    #[must_use]
    pub fn is_at_zero(&self, color: Color) -> bool {
        self.at_zero.contains(&color)
    }

    /// Number of players the scoreboard was built for.
    #[must_use]
    pub const fn total_players(&self) -> usize {
        self.total_players
    }

    /// Apply a contact outcome. Returns the color eliminated by it, if any.
    pub fn record(&mut self, taker: Color, outcome: ContactOutcome) -> Option<Color> {
        if outcome.changed_owner() {
            // A player at zero whose pulse is still in play can win cells back.
            self.at_zero.remove(&taker);
        }
        match outcome {
            ContactOutcome::Stolen {
                from,
                eliminated: true,
            } => {
                self.at_zero.insert(from);
                Some(from)
            }
            _ => None,
        }
    }

    /// Whether every player but one is at zero.
    #[must_use]
    pub fn has_sole_survivor(&self) -> bool {
        self.total_players >= 2 && self.zero_score_count() + 1 == self.total_players
    }
}

/// Rank players by score, highest first.
///
/// Ties keep registry order.
#[must_use]
pub fn final_ranking(registry: &PlayerRegistry) -> Vec<Standing> {
    let mut players: Vec<(Color, u32)> = registry.iter().map(|p| (p.color, p.score())).collect();
    players.sort_by(|a, b| b.1.cmp(&a.1));
    players
        .into_iter()
        .enumerate()
        .map(|(i, (color, score))| Standing {
            rank: i + 1,
            color,
            score,
        })
        .collect()
}
