//! Player state management.

use std::collections::BTreeSet;

use crate::error::{MatchError, MatchResult};
use crate::game::{CellId, Color, Point};

/// An expanding circle that captures the cells it reaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Center of the circle.
    pub origin: Point,
    /// Cell the pulse was placed on.
    pub origin_cell: CellId,
    /// Current radius.
    pub radius: f64,
    /// Radius before the last growth step.
    pub prev_radius: f64,
}

impl Pulse {
    /// Place a fresh pulse on a cell.
    #[must_use]
    pub const fn new(origin: Point, origin_cell: CellId, radius: f64) -> Self {
        Self {
            origin,
            origin_cell,
            radius,
            prev_radius: 0.0,
        }
    }

    /// Grow the radius by `amount`, remembering the previous one.
    pub fn grow(&mut self, amount: f64) {
        self.prev_radius = self.radius;
        self.radius += amount;
    }

    /// Whether the pulse has not grown since it was placed.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.prev_radius <= 0.0
    }
}

/// State for a single player.
#[derive(Debug, Clone)]
pub struct Player {
    /// Color, the player's identity.
    pub color: Color,
    /// Whether a policy rather than a human drives this player.
    pub is_computer: bool,
    /// Number of owned cells.
    score: u32,
    /// Ids of owned cells.
    owned: BTreeSet<CellId>,
    /// Pulse in play, if any.
    pub pulse: Option<Pulse>,
    /// Whether the pulse was already moved during the current gesture.
    pub moved_this_gesture: bool,
}

impl Player {
    /// Create a player with no territory.
    #[must_use]
    pub const fn new(color: Color, is_computer: bool) -> Self {
        Self {
            color,
            is_computer,
            score: 0,
            owned: BTreeSet::new(),
            pulse: None,
            moved_this_gesture: false,
        }
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Owned cell ids in ascending order.
    #[must_use]
    pub const fn owned(&self) -> &BTreeSet<CellId> {
        &self.owned
    }

    /// Whether this player owns a cell.
    #[must_use]
    pub fn owns(&self, cell: CellId) -> bool {
        self.owned.contains(&cell)
    }

    /// Add a cell and bump the score.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the cell is already owned.
    pub(crate) fn add_cell(&mut self, cell: CellId) -> MatchResult<()> {
        if !self.owned.insert(cell) {
            return Err(MatchError::invariant(format!(
                "{} already owns cell {cell}",
                self.color
            )));
        }
        self.score += 1;
        Ok(())
    }

    /// Remove a cell and drop the score.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the cell is not owned or the score
    /// would go negative. The player is left untouched in that case.
    pub(crate) fn remove_cell(&mut self, cell: CellId) -> MatchResult<()> {
        let Some(score) = self.score.checked_sub(1) else {
            return Err(MatchError::invariant(format!(
                "{} score would go negative",
                self.color
            )));
        };
        if !self.owned.remove(&cell) {
            return Err(MatchError::invariant(format!(
                "{} does not own cell {cell}",
                self.color
            )));
        }
        self.score = score;
        Ok(())
    }

    /// Drop all territory and pulse state.
    pub(crate) fn clear(&mut self) {
        self.owned.clear();
        self.score = 0;
        self.pulse = None;
        self.moved_this_gesture = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(Color::Red, false);
        assert_eq!(player.color, Color::Red);
        assert_eq!(player.score(), 0);
        assert!(player.owned().is_empty());
        assert!(player.pulse.is_none());
    }

    #[test]
    fn test_add_remove_keeps_score_in_sync() {
        let mut player = Player::new(Color::Blue, true);
        player.add_cell(4).unwrap();
        player.add_cell(9).unwrap();
        assert_eq!(player.score(), 2);
        assert!(player.owns(9));

        player.remove_cell(4).unwrap();
        assert_eq!(player.score(), 1);
        assert_eq!(player.owned().len(), 1);
    }

    #[test]
    fn test_double_add_rejected() {
        let mut player = Player::new(Color::Blue, false);
        player.add_cell(1).unwrap();
        assert!(matches!(
            player.add_cell(1),
            Err(MatchError::InvariantViolation(_))
        ));
        assert_eq!(player.score(), 1);
    }

    #[test]
    fn test_remove_below_zero_rejected() {
        let mut player = Player::new(Color::Green, false);
        assert!(matches!(
            player.remove_cell(0),
            Err(MatchError::InvariantViolation(_))
        ));
        assert_eq!(player.score(), 0);

        player.add_cell(2).unwrap();
        assert!(player.remove_cell(3).is_err());
        assert_eq!(player.score(), 1);
    }

    #[test]
    fn test_pulse_growth() {
        let mut pulse = Pulse::new(Point::new(1.0, 2.0), 7, 0.6);
        assert!(pulse.is_fresh());
        pulse.grow(0.5);
        assert!(!pulse.is_fresh());
        assert!((pulse.radius - 1.1).abs() < 1e-12);
        assert!((pulse.prev_radius - 0.6).abs() < 1e-12);
    }
}
