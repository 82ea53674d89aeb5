//! Player colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the six selectable player colors.
///
/// A color is the identity of a player for the lifetime of a match. The
/// derived ordering fixes the registry's iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Yellow.
    Yellow,
    /// Orange.
    Orange,
    /// Red.
    Red,
    /// Purple.
    Purple,
    /// Blue.
    Blue,
    /// Green.
    Green,
}

impl Color {
    /// Every color in selection-screen order.
    pub const ALL: [Color; 6] = [
        Color::Yellow,
        Color::Orange,
        Color::Red,
        Color::Purple,
        Color::Blue,
        Color::Green,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::Red => "red",
            Color::Purple => "purple",
            Color::Blue => "blue",
            Color::Green => "green",
        }
    }

    /// Single-letter symbol used by the text renderer.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Color::Yellow => 'Y',
            Color::Orange => 'O',
            Color::Red => 'R',
            Color::Purple => 'P',
            Color::Blue => 'B',
            Color::Green => 'G',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown color name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color: {0}")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Color::ALL
            .into_iter()
            .find(|c| c.name() == lower || c.symbol().to_ascii_lowercase().to_string() == lower)
            .ok_or(ParseColorError(lower))
    }
}
