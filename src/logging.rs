// src/logging.rs
// Simple logging utility for the bingo game.
//
// The interactive screen owns stdout, so log lines go to stderr unless a
// log file has been configured with `set_log_file`.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();
static STDERR_ENABLED: AtomicBool = AtomicBool::new(true);

/// Log level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Send every following log line to `path` (appending).
///
/// The log file can be chosen once per process; a second call fails with
/// `AlreadyExists` and leaves the first file in place.
pub fn set_log_file<P: AsRef<Path>>(path: P) -> io::Result<()> {
    install_log_file(&LOG_FILE, path.as_ref())
}

fn install_log_file(slot: &OnceLock<Mutex<File>>, path: &Path) -> io::Result<()> {
    if slot.get().is_some() {
        return Err(already_set(path));
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    slot.set(Mutex::new(file)).map_err(|_| already_set(path))
}

fn already_set(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("log file already set, ignoring {}", path.display()),
    )
}

/// Turn stderr output on or off when no log file is set.
pub fn set_stderr_logging(enabled: bool) {
    STDERR_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Render a log line with timestamp
pub fn format_line(level: LogLevel, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("{} - {} - {}", timestamp, level.as_str(), message)
}

/// Format and write a log message with timestamp
///
/// If the log file cannot be written the line falls back to stderr, together
/// with the write error, whenever stderr output is enabled.
pub fn log_message(level: LogLevel, message: &str) {
    let line = format_line(level, message);
    let stderr = STDERR_ENABLED.load(Ordering::Relaxed);
    match LOG_FILE.get() {
        Some(file) => {
            if let Err(e) = write_line(file, &line) {
                if stderr {
                    eprintln!("could not write log file: {e}");
                    eprintln!("{line}");
                }
            }
        }
        None if stderr => eprintln!("{line}"),
        None => {}
    }
}

fn write_line(file: &Mutex<File>, line: &str) -> io::Result<()> {
    let mut file = file
        .lock()
        .map_err(|_| io::Error::other("log file lock poisoned"))?;
    writeln!(file, "{line}")
}

/// Log a debug message
pub fn log_debug(message: &str) {
    log_message(LogLevel::Debug, message);
}

/// Log an info message
pub fn log_info(message: &str) {
    log_message(LogLevel::Info, message);
}

/// Log a warning message
pub fn log_warning(message: &str) {
    log_message(LogLevel::Warning, message);
}

/// Log an error message
pub fn log_error(message: &str) {
    log_message(LogLevel::Error, message);
}
