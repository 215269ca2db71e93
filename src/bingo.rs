// src/bingo.rs
// Entry point for the interactive bingo card.
//
// CLI Options:
// - --dimension: Card size to offer on the setup screen (minimum 3)
// - --seed: Seed the random generator for a reproducible session
// - --config: Path of the configuration file (default conf/bingo.conf)
// - --print: Print a fresh card as text and exit
// - --json: Print a fresh card as JSON and exit

use std::error::Error;
use std::io;

use clap::Parser;

use bingo::announce::{LogAnnouncer, SpeechAnnouncer};
use bingo::config::{GameConfig, DEFAULT_CONFIG_PATH};
use bingo::defs::clamp_dimension;
use bingo::error::BingoError;
use bingo::logging::{log_error, log_info, log_warning, set_log_file};
use bingo::session::Session;
use bingo::terminal::{self, Action, Cursor, TerminalGuard};

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(about = "Bingo - generate a card and mark it until you get a line")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Card dimension (default from config)
    #[arg(short, long)]
    dimension: Option<usize>,

    /// Seed for a reproducible session
    #[arg(short, long)]
    seed: Option<u64>,

    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Print a card as text and exit
    #[arg(long)]
    print: bool,

    /// Print a card as JSON and exit
    #[arg(long, conflicts_with = "print")]
    json: bool,
}

struct App {
    session: Session,
    cursor: Cursor,
    toast: Option<String>,
}

impl App {
    fn new(session: Session) -> Self {
        Self {
            session,
            cursor: Cursor::default(),
            toast: None,
        }
    }

    /// Apply one action. Returns false when the user asked to quit.
    fn handle(&mut self, action: Action) -> Result<bool, Box<dyn Error>> {
        self.toast = None;
        match action {
            Action::Quit => return Ok(false),
            Action::Digit(ch) => self.session.push_dimension_char(ch),
            Action::DeleteDigit => self.session.pop_dimension_char(),
            Action::Generate => {
                if self.session.can_generate() {
                    self.session.start()?;
                    self.cursor = Cursor::default();
                    self.warn_if_too_large();
                }
            }
            Action::Move(direction) => {
                self.cursor = self.cursor.moved(direction, self.session.dimension());
            }
            Action::Toggle => {
                let outcome = self.session.toggle(self.cursor.row, self.cursor.col)?;
                if outcome.won {
                    self.toast = Some(self.session.announcement().to_string());
                }
            }
            Action::Regenerate => {
                self.session.regenerate()?;
                self.cursor = Cursor::default();
            }
            Action::Back => self.session.back_to_setup(),
        }
        Ok(true)
    }

    fn warn_if_too_large(&mut self) {
        if let Some(card) = self.session.card() {
            if !terminal::fits_terminal(card.dimension(), terminal::cell_width(card)) {
                self.toast = Some("The card is larger than the terminal window".to_string());
            }
        }
    }
}

fn run_interactive(session: Session) -> Result<(), Box<dyn Error>> {
    let guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    let mut app = App::new(session);

    loop {
        terminal::render(&mut stdout, &app.session, app.cursor, app.toast.as_deref())?;
        let action = terminal::read_action(app.session.screen())?;
        match app.handle(action) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                log_error(&format!("Action {action:?} failed: {e}"));
                app.toast = Some(format!("Error: {e}"));
            }
        }
    }

    drop(guard);
    log_info(&format!("Session {} closed", app.session.id()));
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = GameConfig::load_from_or_default(&args.config);
    if let Some(dimension) = args.dimension {
        config.dimension = clamp_dimension(dimension);
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(path) = &config.log_file {
        set_log_file(path)?;
    }

    if args.print || args.json {
        let mut session = Session::new(&config);
        session.start()?;
        let card = session.card().ok_or(BingoError::NoActiveCard)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(card)?);
        } else {
            println!("UID: {}", session.id());
            print!("{card}");
        }
        return Ok(());
    }

    let mut session = Session::new(&config);
    session.add_announcer(Box::new(LogAnnouncer));
    if let Some(command) = &config.speech_command {
        match SpeechAnnouncer::from_command(command) {
            Some(speech) => session.add_announcer(Box::new(speech)),
            None => log_warning("Ignoring empty speech_command"),
        }
    }

    run_interactive(session)
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
