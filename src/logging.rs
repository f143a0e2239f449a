//! Minimal stderr logger for the binaries.
//!
//! The library only talks to the `log` facade, so embedders can install
//! whatever logger they like instead.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::Level;
use log::LevelFilter;
use log::Log;
use log::Metadata;
use log::Record;
use owo_colors::OwoColorize;

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

#[derive(Debug)]
pub struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl StderrLogger {
    fn new(level: LevelFilter) -> Self {
        Self {
            level,
            started: Instant::now(),
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

/// Installs the logger, showing records up to `level`.
///
/// Fails if some logger was already installed.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let logger = LOGGER.get_or_init(|| StderrLogger::new(level));
    log::set_logger(logger)?;
    log::set_max_level(logger.level());
    Ok(())
}

/// Maps the count of `-v` flags to a level filter, starting at warnings.
pub fn verbosity_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn level_tag(level: Level) -> String {
    match level {
        Level::Error => "ERROR".red().bold().to_string(),
        Level::Warn => " WARN".yellow().bold().to_string(),
        Level::Info => " INFO".green().to_string(),
        Level::Debug => "DEBUG".blue().to_string(),
        Level::Trace => "TRACE".dimmed().to_string(),
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let t = self.started.elapsed();
        anstream::eprintln!(
            "{:>4}.{:03} {} {} {}",
            t.as_secs(),
            t.subsec_millis(),
            level_tag(record.level()),
            record.target().dimmed(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = anstream::stderr().flush();
    }
}
