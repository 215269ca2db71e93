// src/announce.rs
// Presentation collaborators notified when a toggle completes a bingo.

use crate::logging::{log_info, log_warning};
use crate::win::Line;

use std::process::{Child, Command, Stdio};

/// Raised by the session every time a toggle leaves the card in a won state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BingoEvent {
    pub session_id: String,
    pub message: String,
    pub lines: Vec<Line>,
}

impl BingoEvent {
    pub fn describe_lines(&self) -> String {
        self.lines
            .iter()
            .map(Line::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub trait Announcer {
    fn announce(&mut self, event: &BingoEvent);
}

/// Writes each bingo to the log.
#[derive(Debug, Default)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&mut self, event: &BingoEvent) {
        log_info(&format!(
            "{} session {} completed {}",
            event.message,
            event.session_id,
            event.describe_lines()
        ));
    }
}

/// Speaks the announcement through an external text-to-speech program.
///
/// A new announcement cuts off the one still playing, and every spawned
/// process is waited for so none is left behind as a zombie.
#[derive(Debug)]
pub struct SpeechAnnouncer {
    program: String,
    args: Vec<String>,
    speaking: Option<Child>,
}

impl SpeechAnnouncer {
    /// `command` is split on whitespace: the first word is the program, the
    /// rest are passed before the announcement text.
    pub fn from_command(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(SpeechAnnouncer {
            program,
            args: words.collect(),
            speaking: None,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// True while the last announcement is still being spoken.
    pub fn is_speaking(&mut self) -> bool {
        self.reap();
        self.speaking.is_some()
    }

    // Forget the child once it has exited.
    fn reap(&mut self) {
        if let Some(child) = self.speaking.as_mut() {
            match child.try_wait() {
                Ok(Some(_)) => self.speaking = None,
                Ok(None) => {}
                Err(e) => {
                    log_warning(&format!("Could not check speech command '{}': {}", self.program, e));
                    self.speaking = None;
                }
            }
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.speaking.take() {
            let _ = child.kill();
            if let Err(e) = child.wait() {
                log_warning(&format!("Could not wait for speech command '{}': {}", self.program, e));
            }
        }
    }

    fn build_command(&self, text: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

impl Announcer for SpeechAnnouncer {
    fn announce(&mut self, event: &BingoEvent) {
        self.stop();
        // Not awaited here; a slow speech engine must not block the game.
        match self.build_command(&event.message).spawn() {
            Ok(child) => self.speaking = Some(child),
            Err(e) => log_warning(&format!("Could not run speech command '{}': {}", self.program, e)),
        }
    }
}

impl Drop for SpeechAnnouncer {
    fn drop(&mut self) {
        self.stop();
    }
}
