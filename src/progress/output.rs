//! Output mode configuration for progress display.

use std::sync::{Mutex, PoisonError};

use super::state::env_text_mode;

/// Output mode for progress display.
///
/// Controls how the status line is written to the terminal.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ProgressOutput {
    /// A single line rewritten in place on every redraw tick.
    ///
    /// This is the default mode. Each redraw starts with a carriage return so it
    /// replaces the previous one; only the final line ends with a newline.
    UI,
    /// Simple text output for non-interactive environments.
    ///
    /// In this mode only the first and the final line are printed, each on its own
    /// line, and periodic ticks are skipped. Use this for CI systems, log files, or
    /// when stderr is not a terminal.
    Text,
}

static OUTPUT: Mutex<ProgressOutput> = Mutex::new(ProgressOutput::UI);

/// Sets the default output mode for ranges built afterwards.
///
/// # Examples
///
/// ```rust,no_run
/// use nrange::progress::{set_output, ProgressOutput};
///
/// // Use text mode for CI environments
/// if std::env::var("CI").is_ok() {
///     set_output(ProgressOutput::Text);
/// }
/// ```
pub fn set_output(output: ProgressOutput) {
    *OUTPUT.lock().unwrap_or_else(PoisonError::into_inner) = output;
}

/// Returns the current default output mode.
///
/// If `NRANGE_TEXT_MODE=1` environment variable is set, this always returns
/// [`ProgressOutput::Text`] regardless of what was set via [`set_output`].
#[must_use]
pub fn output() -> ProgressOutput {
    // Environment variable takes precedence
    if env_text_mode() {
        return ProgressOutput::Text;
    }
    *OUTPUT.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_get_set() {
        let original = output();

        set_output(ProgressOutput::Text);
        assert_eq!(output(), ProgressOutput::Text);

        set_output(ProgressOutput::UI);
        assert_eq!(output(), ProgressOutput::UI);

        set_output(original);
    }
}
