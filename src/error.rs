// src/error.rs
// Error type for card generation, card construction and session operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BingoError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Cell ({row}, {col}) is outside a {dimension}x{dimension} card")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        dimension: usize,
    },
    #[error("No card is active in this session")]
    NoActiveCard,
}

pub type Result<T> = std::result::Result<T, BingoError>;
