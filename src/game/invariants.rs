//! Board invariants - sanity checks that detect bugs.
//!
//! Every mutation path keeps the grid and the registry in lockstep, so these
//! should NEVER trigger. If they do, a caller broke the call discipline.

use thiserror::Error;

use crate::game::{HexGrid, PlayerRegistry};

/// A board invariant that does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("board violation: {message}")]
pub struct BoardViolation {
    /// Description of the violated invariant.
    pub message: String,
}

/// Check all board invariants.
///
/// Returns a list of violations found, or empty if all invariants hold:
/// - each player's score equals the size of its territory and the number
///   of grid cells carrying its color
/// - each cell owned on the grid is listed by exactly its owner, and
///   every listed cell is owned on the grid by that player
/// - scores plus neutral cells add up to the grid size
#[must_use]
pub fn check_invariants(grid: &HexGrid, registry: &PlayerRegistry) -> Vec<BoardViolation> {
    let mut violations = Vec::new();

    for player in registry.iter() {
        if player.score() as usize != player.owned().len() {
            violations.push(BoardViolation {
                message: format!(
                    "{} has score {} but owns {} cells",
                    player.color,
                    player.score(),
                    player.owned().len()
                ),
            });
        }

        let on_grid = grid.count_owned_by(player.color);
        if player.score() as usize != on_grid {
            violations.push(BoardViolation {
                message: format!(
                    "{} has score {} but the grid shows {on_grid} of its cells",
                    player.color,
                    player.score()
                ),
            });
        }

        for &id in player.owned() {
            match grid.cell(id) {
                None => violations.push(BoardViolation {
                    message: format!("{} lists unknown cell {id}", player.color),
                }),
                Some(cell) if cell.owner != Some(player.color) => {
                    violations.push(BoardViolation {
                        message: format!(
                            "{} lists cell {id} but the grid says {:?}",
                            player.color, cell.owner
                        ),
                    });
                }
                Some(_) => {}
            }
        }
    }

    for cell in grid.iter() {
        let Some(owner) = cell.owner else {
            continue;
        };
        let listed_by: Vec<_> = registry
            .iter()
            .filter(|p| p.owns(cell.id))
            .map(|p| p.color)
            .collect();
        if listed_by != [owner] {
            violations.push(BoardViolation {
                message: format!(
                    "cell {} owned by {owner} is listed by {listed_by:?}",
                    cell.id
                ),
            });
        }
    }

    let total = registry.total_score() + grid.neutral_count() as u64;
    if total != grid.len() as u64 {
        violations.push(BoardViolation {
            message: format!(
                "scores plus neutral cells = {total}, grid has {} cells",
                grid.len()
            ),
        });
    }

    violations
}

/// Assert all board invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(grid: &HexGrid, registry: &PlayerRegistry) {
    let violations = check_invariants(grid, registry);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Board invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_grid: &HexGrid, _registry: &PlayerRegistry) {}
