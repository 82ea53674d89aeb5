//! Players keyed by color.

use std::collections::BTreeMap;

use rand::Rng;

use crate::error::{MatchError, MatchResult};
use crate::game::{CellId, Color, Player};

/// The fewest players a match can hold.
pub const MIN_PLAYERS: usize = 2;

/// The most players a match can hold (one per color).
pub const MAX_PLAYERS: usize = Color::ALL.len();

/// Every participant in a match, one per color.
///
/// Backed by an ordered map so iteration (and therefore every seeded
/// random choice) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: BTreeMap<Color, Player>,
}

impl PlayerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            players: BTreeMap::new(),
        }
    }

    /// Register a new player.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateColor` if the color is already taken.
    pub fn register(&mut self, color: Color, is_computer: bool) -> MatchResult<&Player> {
        if self.players.contains_key(&color) {
            return Err(MatchError::DuplicateColor(color));
        }
        let player = self
            .players
            .entry(color)
            .or_insert_with(|| Player::new(color, is_computer));
        Ok(&*player)
    }

    /// Look up a player.
    #[must_use]
    pub fn get(&self, color: Color) -> Option<&Player> {
        self.players.get(&color)
    }

    /// Look up a player mutably.
    pub fn get_mut(&mut self, color: Color) -> Option<&mut Player> {
        self.players.get_mut(&color)
    }

    /// Whether the color takes part in the match.
    #[must_use]
    pub fn contains(&self, color: Color) -> bool {
        self.players.contains_key(&color)
    }

    /// Number of players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no player is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Iterate players in color order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Iterate players mutably in color order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.values_mut()
    }

    /// Registered colors in order.
    #[must_use]
    pub fn colors(&self) -> Vec<Color> {
        self.players.keys().copied().collect()
    }

    /// Score of a player, if registered.
    #[must_use]
    pub fn score(&self, color: Color) -> Option<u32> {
        self.get(color).map(Player::score)
    }

    /// Sum of every player's score.
    #[must_use]
    pub fn total_score(&self) -> u64 {
        self.iter().map(|p| u64::from(p.score())).sum()
    }

    /// Give a cell to a player.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlayer` for an unregistered color and
    /// `InvariantViolation` if the player already owns the cell.
    pub fn add_cell(&mut self, color: Color, cell: CellId) -> MatchResult<()> {
        self.players
            .get_mut(&color)
            .ok_or(MatchError::UnknownPlayer(color))?
            .add_cell(cell)
    }

    /// Take a cell away from a player.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlayer` for an unregistered color and
    /// `InvariantViolation` if the score would go negative or the player does
    /// not own the cell.
    pub fn remove_cell(&mut self, color: Color, cell: CellId) -> MatchResult<()> {
        self.players
            .get_mut(&color)
            .ok_or(MatchError::UnknownPlayer(color))?
            .remove_cell(cell)
    }

    /// Pick one of the player's cells uniformly at random.
    #[must_use]
    pub fn choose_random_owned_cell<R: Rng + ?Sized>(
        &self,
        color: Color,
        rng: &mut R,
    ) -> Option<CellId> {
        let owned = self.get(color)?.owned();
        if owned.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..owned.len());
        owned.iter().nth(index).copied()
    }

    /// Drop every player's territory and pulse.
    pub fn clear_territory(&mut self) {
        for player in self.iter_mut() {
            player.clear();
        }
    }
}
