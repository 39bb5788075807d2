//! Frame rendering for the status line.
//!
//! Everything here is pure: a [`Snapshot`] of the counters goes in, a [`Frame`]
//! with the formatted line and its derived metrics comes out.

use std::time::Duration;

use serde::Serialize;

use crate::progress_bar::{ProgressBarChars, progress_bar_with_chars};

use super::format::{format_count, format_rate, format_time, rate};
use super::unit::TimeUnit;

/// Display configuration of one status line.
#[derive(Debug, Clone)]
pub struct LineConfig {
    pub description: String,
    pub bar_len: usize,
    pub chars: ProgressBarChars,
    pub loop_append: String,
    pub unit: String,
    pub time_unit: TimeUnit,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            description: String::new(),
            bar_len: 35,
            chars: ProgressBarChars::default(),
            loop_append: String::new(),
            unit: "loop".to_string(),
            time_unit: TimeUnit::default(),
        }
    }
}

/// Counter values sampled for one redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub current: u64,
    pub total: u64,
    pub elapsed: Duration,
    /// Forces a complete bar regardless of the counters.
    pub complete: bool,
}

/// A rendered status line and the numbers it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub current: u64,
    pub total: u64,
    pub percent: u8,
    /// Elapsed time in the configured unit.
    pub elapsed: f64,
    /// Linear estimate of the total run time in the configured unit.
    pub estimated: f64,
    pub rate: f64,
    pub complete: bool,
    pub line: String,
}

/// Whole percent of `current` over `total`, clamped to `0..=100`.
///
/// An empty total reports 0.
pub fn percent(current: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (current as u128 * 100) / total as u128;
    pct.min(100) as u8
}

/// Builds the status line for `snapshot`.
pub fn render(config: &LineConfig, snapshot: &Snapshot) -> Frame {
    let unit = config.time_unit;
    let percent = if snapshot.complete {
        100
    } else {
        percent(snapshot.current, snapshot.total)
    };
    let elapsed = unit.convert(snapshot.elapsed);
    let estimated = elapsed * snapshot.total as f64 / snapshot.current.max(1) as f64;
    let rate = rate(snapshot.current, snapshot.elapsed, unit);

    let line = format!(
        "{}{}%|{}| {}/{} [Time elapsed:{}, Time estimated:{}, {}]",
        config.description,
        percent,
        progress_bar_with_chars(percent, config.bar_len, &config.chars),
        format_count(snapshot.current, &config.loop_append),
        format_count(snapshot.total, &config.loop_append),
        format_time(elapsed, unit),
        format_time(estimated, unit),
        format_rate(rate, &config.unit, unit),
    );

    Frame {
        current: snapshot.current,
        total: snapshot.total,
        percent,
        elapsed,
        estimated,
        rate,
        complete: snapshot.complete,
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(current: u64, total: u64, secs: u64) -> Snapshot {
        Snapshot {
            current,
            total,
            elapsed: Duration::from_secs(secs),
            complete: false,
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 10), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 66);
        assert_eq!(percent(10, 10), 100);
        assert_eq!(percent(5, 0), 0);
        assert_eq!(percent(20, 10), 100);
        assert_eq!(percent(u64::MAX, u64::MAX), 100);
    }

    #[test]
    fn test_render_line_layout() {
        let config = LineConfig {
            description: "Copying: ".to_string(),
            bar_len: 10,
            unit: "file".to_string(),
            ..Default::default()
        };
        let frame = render(&config, &snapshot(5, 10, 2));
        assert_eq!(
            frame.line,
            "Copying: 50%|█████     | 5/10 [Time elapsed:2.00s, Time estimated:4.00s, 2.50 file/s]"
        );
        assert_eq!(frame.percent, 50);
        assert_eq!(frame.estimated, 4.0);
        assert_eq!(frame.rate, 2.5);
    }

    #[test]
    fn test_render_loop_append() {
        let config = LineConfig {
            loop_append: "K".to_string(),
            bar_len: 4,
            ..Default::default()
        };
        let frame = render(&config, &snapshot(857, 857, 1));
        assert!(frame.line.contains("| 857K/857K ["), "{}", frame.line);
    }

    #[test]
    fn test_render_time_unit() {
        let config = LineConfig {
            time_unit: TimeUnit::Millisecond,
            bar_len: 4,
            ..Default::default()
        };
        let frame = render(&config, &snapshot(4, 8, 2));
        assert!(
            frame.line.ends_with("[Time elapsed:2000.00ms, Time estimated:4000.00ms, 0.00 loop/ms]"),
            "{}",
            frame.line
        );
    }

    #[test]
    fn test_render_zero_elapsed_and_zero_current() {
        let frame = render(&LineConfig::default(), &snapshot(0, 10, 0));
        assert_eq!(frame.percent, 0);
        assert_eq!(frame.rate, 0.0);
        assert_eq!(frame.estimated, 0.0);
        assert!(frame.line.starts_with(&format!("0%|{}|", " ".repeat(35))));
    }

    #[test]
    fn test_render_empty_total() {
        let mut snap = snapshot(0, 0, 3);
        let frame = render(&LineConfig::default(), &snap);
        assert_eq!(frame.percent, 0);
        assert_eq!(frame.estimated, 0.0);

        snap.complete = true;
        let frame = render(&LineConfig::default(), &snap);
        assert_eq!(frame.percent, 100);
        assert!(frame.line.starts_with(&format!("100%|{}| 0/0 [", "█".repeat(35))));
    }

    #[test]
    fn test_render_complete_forces_full_bar() {
        let snap = Snapshot {
            complete: true,
            ..snapshot(3, 10, 1)
        };
        let frame = render(&LineConfig::default(), &snap);
        assert_eq!(frame.percent, 100);
        assert!(frame.line.contains(&"█".repeat(35)));
        assert!(frame.line.contains("| 3/10 ["));
    }
}
