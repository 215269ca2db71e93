// src/defs.rs
// Shared constants and basic types for the bingo game.

use serde::{Deserialize, Serialize};

pub type Number = u32;

pub const MIN_DIMENSION: usize = 3; // smallest playable card
pub const MAX_DIMENSION: usize = 50; // largest card the session will generate
pub const DEFAULT_DIMENSION: usize = 5; // card size offered on the setup screen
pub const POOL_FACTOR: usize = 2; // numbers are drawn from 1..=POOL_FACTOR * dimension^2
pub const SESSION_ID_LEN: usize = 6;
pub const DEFAULT_ANNOUNCEMENT: &str = "¡BINGO!";

/// A single numbered entry of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub number: Number,
    #[serde(default)]
    pub is_marked: bool,
}

impl Cell {
    pub fn new(number: Number) -> Self {
        Cell {
            number,
            is_marked: false,
        }
    }

    pub fn number(&self) -> Number {
        self.number
    }

    pub fn is_marked(&self) -> bool {
        self.is_marked
    }

    /// Returns a copy of this cell with the marked flag flipped.
    pub fn flipped(self) -> Self {
        Cell {
            is_marked: !self.is_marked,
            ..self
        }
    }
}

/// Raises a user supplied dimension to the minimum playable size.
pub fn clamp_dimension(dimension: usize) -> usize {
    dimension.max(MIN_DIMENSION)
}
