use unicode_width::UnicodeWidthStr;

use crate::{Error, Result};

/// Default glyph for the completed portion of the bar.
pub(crate) const DEFAULT_FILL: &str = "█";

/// Characters used to render a progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBarChars {
    /// Character for filled portion (default: "█")
    pub fill: String,
    /// Character for empty portion (default: " ")
    pub empty: String,
}

impl Default for ProgressBarChars {
    fn default() -> Self {
        Self {
            fill: DEFAULT_FILL.to_string(),
            empty: " ".to_string(),
        }
    }
}

impl ProgressBarChars {
    /// Creates bar characters with a custom fill glyph and blank empty cells.
    ///
    /// The glyph must occupy exactly one terminal column, otherwise the bar
    /// would not be `bar_len` columns wide.
    pub fn with_fill(fill: impl Into<String>) -> Result<Self> {
        let fill = fill.into();
        if fill.width() != 1 || fill.chars().count() != 1 {
            return Err(Error::invalid(format!(
                "bar_char must be a single one-column glyph, got {fill:?}"
            )));
        }
        Ok(Self {
            fill,
            ..Default::default()
        })
    }
}

/// Number of filled cells for `percent` on a bar `width` cells wide.
pub(crate) fn filled_cells(percent: u8, width: usize) -> usize {
    let percent = percent.min(100) as f64;
    ((width as f64 * percent / 100.0).round() as usize).min(width)
}

pub(crate) fn progress_bar_with_chars(
    percent: u8,
    width: usize,
    chars: &ProgressBarChars,
) -> String {
    let filled = filled_cells(percent, width);
    format!(
        "{}{}",
        chars.fill.repeat(filled),
        chars.empty.repeat(width - filled)
    )
}
