// src/win.rs
// Win detection: a card is a bingo when a whole row, column or diagonal is marked.

use crate::card::Card;
use std::fmt;

/// A line of cells that can complete a bingo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    Row(usize),
    Column(usize),
    MainDiagonal,
    AntiDiagonal,
}

impl Line {
    /// Coordinates `(row, col)` covered by this line on a card of side `n`.
    pub fn cells(&self, n: usize) -> Vec<(usize, usize)> {
        match *self {
            Line::Row(r) => (0..n).map(|c| (r, c)).collect(),
            Line::Column(c) => (0..n).map(|r| (r, c)).collect(),
            Line::MainDiagonal => (0..n).map(|i| (i, i)).collect(),
            Line::AntiDiagonal => (0..n).map(|i| (i, n - 1 - i)).collect(),
        }
    }

    pub fn contains(&self, n: usize, row: usize, col: usize) -> bool {
        match *self {
            Line::Row(r) => r == row && col < n,
            Line::Column(c) => c == col && row < n,
            Line::MainDiagonal => row == col && row < n,
            Line::AntiDiagonal => row < n && col == n - 1 - row,
        }
    }

    fn is_complete(&self, card: &Card) -> bool {
        let rows = card.rows();
        self.cells(card.dimension())
            .into_iter()
            .all(|(r, c)| rows[r][c].is_marked)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Row(r) => write!(f, "row {}", r + 1),
            Line::Column(c) => write!(f, "column {}", c + 1),
            Line::MainDiagonal => write!(f, "main diagonal"),
            Line::AntiDiagonal => write!(f, "anti-diagonal"),
        }
    }
}

/// Every line a card of side `n` can win on, rows first, then columns,
/// then the two diagonals.
fn all_lines(n: usize) -> impl Iterator<Item = Line> {
    (0..n)
        .map(Line::Row)
        .chain((0..n).map(Line::Column))
        .chain([Line::MainDiagonal, Line::AntiDiagonal])
}

/// Returns true if any row, column or main diagonal of the card is fully marked.
pub fn check_win(card: &Card) -> bool {
    all_lines(card.dimension()).any(|line| line.is_complete(card))
}

/// Lists every completed line of the card.
pub fn winning_lines(card: &Card) -> Vec<Line> {
    all_lines(card.dimension())
        .filter(|line| line.is_complete(card))
        .collect()
}
