// src/terminal.rs
// This module handles terminal input/output for the bingo game.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::card::Card;
use crate::defs::Cell;
use crate::logging::set_stderr_logging;
use crate::session::{Screen, Session};
use crate::win::{winning_lines, Line};

pub const MARK_GLYPH: &str = "●";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// User intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Digit(char),
    DeleteDigit,
    Generate,
    Move(Direction),
    Toggle,
    Regenerate,
    Back,
    Quit,
}

pub fn action_for_key(key: KeyEvent, screen: Screen) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match screen {
        Screen::Setup => match key.code {
            KeyCode::Char(ch) if ch.is_ascii_digit() => Some(Action::Digit(ch)),
            KeyCode::Backspace | KeyCode::Delete => Some(Action::DeleteDigit),
            KeyCode::Enter => Some(Action::Generate),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        Screen::Game => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(Direction::Up)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(Direction::Down)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(Direction::Left)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(Direction::Right)),
            KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Toggle),
            KeyCode::Char('r') => Some(Action::Regenerate),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => Some(Action::Back),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
    }
}

/// Grid position highlighted on the game screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    /// Move one step, staying inside a `dimension` x `dimension` grid.
    pub fn moved(self, direction: Direction, dimension: usize) -> Cursor {
        let last = dimension.saturating_sub(1);
        match direction {
            Direction::Up => Cursor { row: self.row.saturating_sub(1), ..self },
            Direction::Down => Cursor { row: (self.row + 1).min(last), ..self },
            Direction::Left => Cursor { col: self.col.saturating_sub(1), ..self },
            Direction::Right => Cursor { col: (self.col + 1).min(last), ..self },
        }
    }
}

/// Raw mode and alternate screen for as long as the guard lives.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        // stderr is not visible behind the alternate screen
        set_stderr_logging(false);
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        set_stderr_logging(true);
    }
}

/// Block until a key maps to an action on the given screen.
pub fn read_action(screen: Screen) -> io::Result<Action> {
    loop {
        if let Event::Key(key) = event::read()? {
            if let Some(action) = action_for_key(key, screen) {
                return Ok(action);
            }
        }
    }
}

/// Width needed to print any number of this card.
pub fn cell_width(card: &Card) -> usize {
    card.numbers()
        .into_iter()
        .max()
        .map_or(1, |n| n.to_string().len())
        .max(2)
}

pub fn cell_label(cell: &Cell, width: usize) -> String {
    if cell.is_marked {
        format!("{MARK_GLYPH:^width$}")
    } else {
        format!("{:^width$}", cell.number)
    }
}

fn on_winning_line(lines: &[Line], dimension: usize, row: usize, col: usize) -> bool {
    lines.iter().any(|line| line.contains(dimension, row, col))
}

pub fn render<W: Write>(out: &mut W, session: &Session, cursor: Cursor, toast: Option<&str>) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    match (session.screen(), session.card()) {
        (Screen::Game, Some(card)) => render_game(out, session, card, cursor, toast)?,
        _ => render_setup(out, session)?,
    }
    out.flush()
}

fn render_setup<W: Write>(out: &mut W, session: &Session) -> io::Result<()> {
    let mut y = 1;
    queue!(out, MoveTo(2, y), PrintStyledContent("BINGO".bold().magenta()))?;
    y += 2;
    queue!(
        out,
        MoveTo(2, y),
        Print("Card dimension: "),
        PrintStyledContent(format!("[{:<4}]", session.dimension_input()).bold()),
    )?;
    if session.can_generate() {
        queue!(out, Print(format!("  ({0}x{0})", session.dimension())))?;
    }
    y += 2;
    queue!(out, MoveTo(2, y), Print(format!("UID: {}", session.id())))?;
    y += 2;

    let hint = if session.can_generate() {
        "Enter: generate card   Backspace: edit   Esc/q: quit".to_string()
    } else {
        "Type a dimension to enable generation   Esc/q: quit".to_string()
    };
    queue!(out, MoveTo(2, y), PrintStyledContent(hint.dark_grey()))?;
    Ok(())
}

fn render_game<W: Write>(out: &mut W, session: &Session, card: &Card, cursor: Cursor, toast: Option<&str>) -> io::Result<()> {
    let dimension = card.dimension();
    let width = cell_width(card);
    let lines = winning_lines(card);
    let rule = "─".repeat((width + 3) * dimension);

    let mut y = 1;
    queue!(out, MoveTo(2, y), PrintStyledContent("BINGO VIRTUAL".bold().magenta()))?;
    y += 1;
    queue!(out, MoveTo(2, y), PrintStyledContent(format!("UID: {}", session.id()).dark_grey()))?;
    y += 1;
    queue!(out, MoveTo(2, y), Print(&rule))?;
    y += 2;

    for (r, row) in card.rows().iter().enumerate() {
        queue!(out, MoveTo(2, y))?;
        for (c, cell) in row.iter().enumerate() {
            let label = format!("[{}]", cell_label(cell, width));
            let styled = if on_winning_line(&lines, dimension, r, c) {
                label.bold().green()
            } else if cell.is_marked {
                label.bold().yellow()
            } else {
                label.cyan()
            };
            let styled = if cursor.row == r && cursor.col == c { styled.reverse() } else { styled };
            queue!(out, PrintStyledContent(styled), Print(" "))?;
        }
        y += 2;
    }

    queue!(out, MoveTo(2, y), Print(&rule))?;
    y += 2;

    if let Some(message) = toast {
        queue!(out, MoveTo(2, y), PrintStyledContent(message.bold().green()))?;
    }
    y += 2;

    queue!(
        out,
        MoveTo(2, y),
        PrintStyledContent("Arrows/hjkl: move   Space: mark   r: regenerate   b/Esc: back   q: quit".dark_grey()),
    )?;
    Ok(())
}

/// True when the terminal is large enough to draw a card of this size.
pub fn fits_terminal(dimension: usize, width: usize) -> bool {
    match terminal::size() {
        Ok((cols, rows)) => {
            let needed_cols = 2 + (width + 3) * dimension;
            let needed_rows = 11 + 2 * dimension;
            needed_cols <= cols as usize && needed_rows <= rows as usize
        }
        Err(_) => true,
    }
}
