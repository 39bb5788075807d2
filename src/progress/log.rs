//! Integration with the `log` crate for logging while a bar is on screen.
//!
//! When enabled (via the `log` feature), this module provides a logger that
//! clears the status line before writing a log message. The renderer draws the
//! line again on its next tick, so log output scrolls above the bar instead of
//! being overwritten by it.
//!
//! # Example
//!
//! ```rust,ignore
//! use nrange::progress::init_log_integration;
//! use log::info;
//!
//! // Initialize the log integration (call once at startup)
//! init_log_integration();
//!
//! for i in nrange::nrange(100)? {
//!     if i % 10 == 0 {
//!         info!("checkpoint {i}");
//!     }
//! }
//! ```

use std::io::Write;

use console::style;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use super::state::{inline_renderers, lock_terminal, term};

/// A logger that keeps its output clear of the progress line.
pub struct ProgressLogger {
    level: LevelFilter,
    target_filter: Option<String>,
}

impl ProgressLogger {
    /// Creates a new progress-aware logger.
    ///
    /// # Arguments
    ///
    /// * `level` - The maximum log level to display
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            target_filter: None,
        }
    }

    /// Creates a new progress-aware logger with a target filter.
    ///
    /// Only log messages whose target starts with the given prefix will be displayed.
    pub fn with_target(level: LevelFilter, target: impl Into<String>) -> Self {
        Self {
            level,
            target_filter: Some(target.into()),
        }
    }

    /// Installs this logger as the global logger.
    ///
    /// # Errors
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format_message(&self, record: &Record) -> String {
        let level_str = match record.level() {
            Level::Error => style("ERROR").for_stderr().red().to_string(),
            Level::Warn => style("WARN").for_stderr().yellow().to_string(),
            Level::Info => style("INFO").for_stderr().cyan().to_string(),
            Level::Debug => style("DEBUG").for_stderr().dim().to_string(),
            Level::Trace => style("TRACE").for_stderr().dim().to_string(),
        };
        format!("{} {}", level_str, record.args())
    }
}

impl Log for ProgressLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        if let Some(ref filter) = self.target_filter {
            metadata.target().starts_with(filter)
        } else {
            true
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = self.format_message(record);
        let _guard = lock_terminal();
        if inline_renderers() > 0 {
            let _ = term().clear_line();
        }
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{}", message);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Initializes the progress-aware logger with the default log level (Info).
///
/// # Panics
///
/// Panics if a logger has already been initialized.
pub fn init_log_integration() {
    ProgressLogger::new(LevelFilter::Info)
        .init()
        .expect("Failed to initialize logger - another logger may already be set");
}

/// Initializes the progress-aware logger with a custom log level.
///
/// # Panics
///
/// Panics if a logger has already been initialized.
pub fn init_log_integration_with_level(level: LevelFilter) {
    ProgressLogger::new(level)
        .init()
        .expect("Failed to initialize logger - another logger may already be set");
}

/// Tries to initialize the progress-aware logger, returning an error on failure.
///
/// # Errors
///
/// Returns an error if a logger has already been set.
pub fn try_init_log_integration() -> Result<(), SetLoggerError> {
    ProgressLogger::new(LevelFilter::Info).init()
}

/// Tries to initialize the progress-aware logger with a custom level.
///
/// # Errors
///
/// Returns an error if a logger has already been set.
pub fn try_init_log_integration_with_level(level: LevelFilter) -> Result<(), SetLoggerError> {
    ProgressLogger::new(level).init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_respects_level_and_target() {
        let logger = ProgressLogger::with_target(LevelFilter::Info, "nrange");
        let info = Metadata::builder().level(Level::Info).target("nrange::demo").build();
        let debug = Metadata::builder().level(Level::Debug).target("nrange::demo").build();
        let other = Metadata::builder().level(Level::Warn).target("other").build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&debug));
        assert!(!logger.enabled(&other));
    }

    #[test]
    fn test_format_message_contains_args() {
        let logger = ProgressLogger::new(LevelFilter::Trace);
        let message = logger.format_message(
            &Record::builder()
                .args(format_args!("checkpoint {}", 7))
                .level(Level::Warn)
                .build(),
        );
        assert!(message.contains("WARN"));
        assert!(message.ends_with("checkpoint 7"));
    }
}
