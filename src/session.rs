// src/session.rs
// The Session struct owns everything one player interacts with: the screen
// being shown, the chosen dimension, the current card and the session UID.
// The terminal shell drives it; the card generator and win detector are
// called from here.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::announce::{Announcer, BingoEvent};
use crate::card::{generate_with_rng, Card};
use crate::config::GameConfig;
use crate::defs::{clamp_dimension, MAX_DIMENSION, SESSION_ID_LEN};
use crate::error::{BingoError, Result};
use crate::logging::{log_debug, log_info};
use crate::win::{winning_lines, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Game,
}

/// Result of a single cell toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub marked: bool,
    pub won: bool,
    pub lines: Vec<Line>,
}

/// Generate a display-only session identifier: each character is an
/// uppercase letter or a digit with equal odds.
pub fn generate_session_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SESSION_ID_LEN)
        .map(|_| {
            if rng.random_bool(0.5) {
                char::from(rng.random_range(b'A'..=b'Z'))
            } else {
                char::from(rng.random_range(b'0'..=b'9'))
            }
        })
        .collect()
}

pub struct Session {
    id: String,
    screen: Screen,
    dimension: usize,
    dimension_input: String,
    card: Option<Card>,
    announcement: String,
    announcers: Vec<Box<dyn Announcer>>,
    rng: StdRng,
}

impl Session {
    /// Create a session seeded from `config.seed`, or from the thread RNG
    /// when no seed is configured.
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::with_rng(config, rng)
    }

    /// Create a fully deterministic session.
    pub fn with_seed(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, mut rng: StdRng) -> Self {
        let dimension = clamp_dimension(config.dimension);
        let id = generate_session_id(&mut rng);
        log_debug(&format!("New session {id} with dimension {dimension}"));

        Self {
            id,
            screen: Screen::Setup,
            dimension,
            dimension_input: dimension.to_string(),
            card: None,
            announcement: config.announcement.clone(),
            announcers: Vec::new(),
            rng,
        }
    }

    /// Register a collaborator to be told about every bingo.
    pub fn add_announcer(&mut self, announcer: Box<dyn Announcer>) {
        self.announcers.push(announcer);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn dimension_input(&self) -> &str {
        &self.dimension_input
    }

    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub fn announcement(&self) -> &str {
        &self.announcement
    }

    /// Store a new dimension, raised to the minimum playable size.
    pub fn set_dimension(&mut self, dimension: usize) {
        self.dimension = clamp_dimension(dimension);
    }

    /// Append a typed character to the dimension field. Non-digits are dropped.
    pub fn push_dimension_char(&mut self, ch: char) {
        if ch.is_ascii_digit() {
            self.dimension_input.push(ch);
            self.apply_dimension_input();
        }
    }

    pub fn pop_dimension_char(&mut self) {
        self.dimension_input.pop();
        self.apply_dimension_input();
    }

    /// Replace the whole dimension field, keeping only its digits.
    pub fn set_dimension_input(&mut self, text: &str) {
        self.dimension_input = text.chars().filter(char::is_ascii_digit).collect();
        self.apply_dimension_input();
    }

    // The last parseable value wins; an empty or overflowing field leaves
    // the previous dimension in place.
    fn apply_dimension_input(&mut self) {
        if let Ok(value) = self.dimension_input.parse::<usize>() {
            self.set_dimension(value);
        }
    }

    pub fn can_generate(&self) -> bool {
        !self.dimension_input.trim().is_empty()
    }

    /// Generate a card for the current dimension and switch to the game screen.
    pub fn start(&mut self) -> Result<()> {
        if !self.can_generate() {
            return Err(BingoError::InvalidArgument("dimension field is empty".to_string()));
        }
        self.card = Some(self.new_card()?);
        self.screen = Screen::Game;
        log_info(&format!("Session {} started a {}x{} card", self.id, self.dimension, self.dimension));
        Ok(())
    }

    /// Replace the current card with a fresh one of the same dimension.
    pub fn regenerate(&mut self) -> Result<()> {
        self.card = Some(self.new_card()?);
        log_info(&format!("Session {} regenerated its card", self.id));
        Ok(())
    }

    fn new_card(&mut self) -> Result<Card> {
        if self.dimension > MAX_DIMENSION {
            return Err(BingoError::InvalidArgument(format!(
                "card dimension {} is larger than {MAX_DIMENSION}",
                self.dimension
            )));
        }
        generate_with_rng(self.dimension, &mut self.rng)
    }

    /// Flip the cell at `(row, col)` and check for a win. Every toggle that
    /// leaves the card won notifies the announcers, even if it was won before.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<ToggleOutcome> {
        let card = self.card.as_ref().ok_or(BingoError::NoActiveCard)?;
        let next = card.toggled(row, col)?;
        let marked = next.cell(row, col)?.is_marked();
        let lines = winning_lines(&next);
        self.card = Some(next);

        let won = !lines.is_empty();
        if won {
            let event = BingoEvent {
                session_id: self.id.clone(),
                message: self.announcement.clone(),
                lines: lines.clone(),
            };
            for announcer in self.announcers.iter_mut() {
                announcer.announce(&event);
            }
        }

        Ok(ToggleOutcome { marked, won, lines })
    }

    /// Drop the card, issue a new session UID and return to the setup screen.
    pub fn back_to_setup(&mut self) {
        self.card = None;
        self.screen = Screen::Setup;
        self.id = generate_session_id(&mut self.rng);
        log_debug(&format!("Back to setup with new session {}", self.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<BingoEvent>>>);

    impl Announcer for Recorder {
        fn announce(&mut self, event: &BingoEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn session_with(dimension: usize) -> Session {
        let config = GameConfig { dimension, ..GameConfig::default() };
        Session::with_seed(&config, 2024)
    }

    fn recording(session: &mut Session) -> Rc<RefCell<Vec<BingoEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        session.add_announcer(Box::new(Recorder(Rc::clone(&events))));
        events
    }

    #[test]
    fn test_session_id_format() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let id = generate_session_id(&mut rng);
            assert_eq!(id.len(), 6);
            assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_new_session_starts_on_setup() {
        let session = session_with(5);
        assert_eq!(session.screen(), Screen::Setup);
        assert_eq!(session.dimension(), 5);
        assert_eq!(session.dimension_input(), "5");
        assert!(session.card().is_none());
        assert!(session.can_generate());
    }

    #[test]
    fn test_dimension_is_clamped() {
        let mut session = session_with(1);
        assert_eq!(session.dimension(), 3);
        session.set_dimension(0);
        assert_eq!(session.dimension(), 3);
        session.set_dimension(9);
        assert_eq!(session.dimension(), 9);
    }

    #[test]
    fn test_dimension_text_input() {
        let mut session = session_with(5);
        session.pop_dimension_char();
        assert_eq!(session.dimension_input(), "");
        assert!(!session.can_generate());
        assert_eq!(session.dimension(), 5);

        session.push_dimension_char('x');
        assert_eq!(session.dimension_input(), "");
        session.push_dimension_char('1');
        assert_eq!(session.dimension(), 3);
        session.push_dimension_char('2');
        assert_eq!(session.dimension_input(), "12");
        assert_eq!(session.dimension(), 12);

        session.set_dimension_input("a7b");
        assert_eq!(session.dimension_input(), "7");
        assert_eq!(session.dimension(), 7);
    }

    #[test]
    fn test_start_requires_dimension_text() {
        let mut session = session_with(4);
        session.set_dimension_input("");
        assert!(session.start().is_err());
        assert_eq!(session.screen(), Screen::Setup);
    }

    #[test]
    fn test_start_generates_card() {
        let mut session = session_with(4);
        session.start().unwrap();
        assert_eq!(session.screen(), Screen::Game);
        let card = session.card().unwrap();
        assert_eq!(card.dimension(), 4);
        assert_eq!(card.marked_count(), 0);
    }

    #[test]
    fn test_oversized_dimension_rejected() {
        let mut session = session_with(3);
        session.set_dimension_input("40000");
        assert_eq!(session.dimension(), 40000);
        assert!(matches!(session.start(), Err(BingoError::InvalidArgument(_))));
        assert_eq!(session.screen(), Screen::Setup);
        assert!(session.card().is_none());

        session.set_dimension_input(&MAX_DIMENSION.to_string());
        session.start().unwrap();
        assert_eq!(session.card().unwrap().dimension(), MAX_DIMENSION);
    }

    #[test]
    fn test_regenerate_rejects_oversized_dimension() {
        let mut session = session_with(4);
        session.start().unwrap();
        let card = session.card().cloned();

        session.set_dimension(MAX_DIMENSION + 1);
        assert!(matches!(session.regenerate(), Err(BingoError::InvalidArgument(_))));
        assert_eq!(session.card().cloned(), card);
    }

    #[test]
    fn test_toggle_without_card() {
        let mut session = session_with(3);
        assert_eq!(session.toggle(0, 0), Err(BingoError::NoActiveCard));
    }

    #[test]
    fn test_toggle_out_of_bounds() {
        let mut session = session_with(3);
        session.start().unwrap();
        let before = session.card().cloned();
        assert!(matches!(session.toggle(0, 3), Err(BingoError::IndexOutOfBounds { .. })));
        assert_eq!(session.card().cloned(), before);
    }

    #[test]
    fn test_toggle_keeps_previous_snapshot() {
        let mut session = session_with(3);
        session.start().unwrap();
        let snapshot = session.card().unwrap().clone();

        let outcome = session.toggle(2, 1).unwrap();
        assert!(outcome.marked);
        assert!(!outcome.won);
        assert_eq!(snapshot.marked_count(), 0);
        assert_eq!(session.card().unwrap().marked_count(), 1);

        let outcome = session.toggle(2, 1).unwrap();
        assert!(!outcome.marked);
        assert_eq!(session.card().unwrap(), &snapshot);
    }

    #[test]
    fn test_diagonal_bingo_announced() {
        let mut session = session_with(3);
        let events = recording(&mut session);
        session.start().unwrap();

        assert!(!session.toggle(0, 0).unwrap().won);
        assert!(!session.toggle(1, 1).unwrap().won);
        let outcome = session.toggle(2, 2).unwrap();
        assert!(outcome.won);
        assert_eq!(outcome.lines, vec![Line::MainDiagonal]);

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].session_id, session.id());
        assert_eq!(events[0].message, "¡BINGO!");
        assert_eq!(events[0].lines, vec![Line::MainDiagonal]);
    }

    #[test]
    fn test_row_bingo_after_last_cell() {
        let mut session = session_with(3);
        session.start().unwrap();
        assert!(!session.toggle(1, 0).unwrap().won);
        assert!(!session.toggle(1, 1).unwrap().won);
        assert!(session.toggle(1, 2).unwrap().won);
    }

    #[test]
    fn test_bingo_refires_while_won() {
        let mut session = session_with(3);
        let events = recording(&mut session);
        session.start().unwrap();
        for c in 0..3 {
            session.toggle(0, c).unwrap();
        }
        assert_eq!(events.borrow().len(), 1);

        // marking an unrelated cell keeps the card won
        assert!(session.toggle(2, 0).unwrap().won);
        assert_eq!(events.borrow().len(), 2);

        // breaking the line stops the announcements
        assert!(!session.toggle(0, 1).unwrap().won);
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_regenerate_replaces_card() {
        let mut session = session_with(5);
        session.start().unwrap();
        session.toggle(0, 0).unwrap();
        let old = session.card().unwrap().clone();

        session.regenerate().unwrap();
        let new = session.card().unwrap();
        assert_eq!(new.dimension(), 5);
        assert_eq!(new.marked_count(), 0);
        assert_ne!(new, &old);
        assert_eq!(session.screen(), Screen::Game);
    }

    #[test]
    fn test_back_to_setup_resets_card_and_id() {
        let mut session = session_with(4);
        let first_id = session.id().to_string();
        session.start().unwrap();

        session.back_to_setup();
        assert_eq!(session.screen(), Screen::Setup);
        assert!(session.card().is_none());
        assert_ne!(session.id(), first_id);
        assert_eq!(session.dimension(), 4);
    }

    #[test]
    fn test_seeded_sessions_match() {
        let config = GameConfig::default();
        let mut a = Session::with_seed(&config, 77);
        let mut b = Session::with_seed(&config, 77);
        assert_eq!(a.id(), b.id());
        a.start().unwrap();
        b.start().unwrap();
        assert_eq!(a.card(), b.card());
    }

    #[test]
    fn test_config_seed_is_used() {
        let config = GameConfig { seed: Some(5), ..GameConfig::default() };
        let a = Session::new(&config);
        let b = Session::with_seed(&config, 5);
        assert_eq!(a.id(), b.id());
    }
}
