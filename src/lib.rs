// lib.rs
// Library modules for the bingo game

pub mod defs;
pub mod error;
pub mod logging;
pub mod config;
pub mod card;
pub mod win;
pub mod announce;
pub mod session;
pub mod terminal;

pub use card::{generate, generate_with_rng, Card};
pub use defs::Cell;
pub use error::{BingoError, Result};
pub use win::{check_win, winning_lines, Line};
