// src/card.rs
// Bingo card representation and random card generation.

use crate::defs::{Cell, Number, POOL_FACTOR};
use crate::error::{BingoError, Result};

use std::collections::HashSet;
use std::fmt;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A square grid of numbered cells.
///
/// A card is an immutable value: marking a cell produces a new card through
/// [`Card::toggled`], so earlier snapshots stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Card {
    rows: Vec<Vec<Cell>>,
}

impl Card {
    /// Builds a card from rows, checking that the grid is square, non-empty
    /// and holds distinct positive numbers.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let dimension = rows.len();
        if dimension == 0 {
            return Err(BingoError::InvalidArgument("card has no rows".to_string()));
        }

        let mut seen = HashSet::with_capacity(dimension * dimension);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != dimension {
                return Err(BingoError::InvalidArgument(format!(
                    "row {r} has {} cells, expected {dimension}",
                    row.len()
                )));
            }
            for cell in row {
                if cell.number == 0 {
                    return Err(BingoError::InvalidArgument(format!("row {r} contains number 0")));
                }
                if !seen.insert(cell.number) {
                    return Err(BingoError::InvalidArgument(format!(
                        "number {} appears more than once",
                        cell.number
                    )));
                }
            }
        }

        Ok(Card { rows })
    }

    /// Side length of the card.
    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&Cell> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .ok_or(BingoError::IndexOutOfBounds {
                row,
                col,
                dimension: self.dimension(),
            })
    }

    /// Returns a new card equal to this one except for the cell at
    /// `(row, col)`, whose marked flag is flipped.
    pub fn toggled(&self, row: usize, col: usize) -> Result<Card> {
        let flipped = self.cell(row, col)?.flipped();
        let mut rows = self.rows.clone();
        rows[row][col] = flipped;
        Ok(Card { rows })
    }

    /// All numbers in row-major order.
    pub fn numbers(&self) -> Vec<Number> {
        self.rows.iter().flatten().map(Cell::number).collect()
    }

    pub fn marked_count(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| cell.is_marked).count()
    }

    /// Largest number a card of this size may contain.
    pub fn max_number(&self) -> Number {
        max_number_for(self.dimension()).unwrap_or(Number::MAX)
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Card {
    type Error = BingoError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self> {
        Card::from_rows(rows)
    }
}

impl From<Card> for Vec<Vec<Cell>> {
    fn from(card: Card) -> Self {
        card.rows
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let largest = self.numbers().into_iter().max().unwrap_or(0);
        let width = self.max_number().max(largest).to_string().len();
        for row in &self.rows {
            let line: Vec<String> = row
                .iter()
                .map(|cell| {
                    if cell.is_marked {
                        format!("{:>width$}", "*")
                    } else {
                        format!("{:>width$}", cell.number)
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Size of the number pool for a card of the given dimension, if it fits.
fn max_number_for(dimension: usize) -> Option<Number> {
    let pool = dimension.checked_mul(dimension)?.checked_mul(POOL_FACTOR)?;
    Number::try_from(pool).ok()
}

/// Generates a fresh card using the thread-local RNG.
pub fn generate(dimension: usize) -> Result<Card> {
    generate_with_rng(dimension, &mut rand::rng())
}

/// Generates a fresh card drawing randomness from `rng`.
///
/// Numbers are a uniformly random selection of `dimension^2` values from
/// `1..=2 * dimension^2`, laid out row by row, all unmarked.
pub fn generate_with_rng<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<Card> {
    if dimension < 1 {
        return Err(BingoError::InvalidArgument(format!(
            "card dimension must be at least 1, got {dimension}"
        )));
    }
    let max_number = max_number_for(dimension).ok_or_else(|| {
        BingoError::InvalidArgument(format!("card dimension {dimension} is too large"))
    })?;

    let mut pool: Vec<Number> = (1..=max_number).collect();
    pool.shuffle(rng);
    pool.truncate(dimension * dimension);

    let rows = pool
        .chunks(dimension)
        .map(|chunk| chunk.iter().copied().map(Cell::new).collect())
        .collect();

    Ok(Card { rows })
}
