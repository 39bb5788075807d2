//! Formatting utilities for times, rates and counts.

use std::time::Duration;

use super::unit::TimeUnit;

/// Formats an amount of time already expressed in `unit`, with two decimals.
///
/// - `format_time(1.5, Second)`: "1.50s"
/// - `format_time(1500.0, Millisecond)`: "1500.00ms"
pub fn format_time(amount: f64, unit: TimeUnit) -> String {
    format!("{:.2}{}", amount, unit)
}

/// Items processed per `unit` of time.
///
/// Returns `0.0` while no time has passed instead of dividing by zero.
pub fn rate(current: u64, elapsed: Duration, unit: TimeUnit) -> f64 {
    let elapsed = unit.convert(elapsed);
    if elapsed > 0.0 {
        current as f64 / elapsed
    } else {
        0.0
    }
}

/// Formats a throughput rate, e.g. "42.50 file/s".
pub fn format_rate(rate: f64, item_unit: &str, unit: TimeUnit) -> String {
    format!("{:.2} {}/{}", rate, item_unit, unit)
}

/// Formats a count with the configured suffix, e.g. "857K".
pub fn format_count(count: u64, append: &str) -> String {
    format!("{count}{append}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_units() {
        let d = Duration::from_millis(1500);
        let fmt = |unit: TimeUnit| format_time(unit.convert(d), unit);
        assert_eq!(fmt(TimeUnit::Second), "1.50s");
        assert_eq!(fmt(TimeUnit::Millisecond), "1500.00ms");
        assert_eq!(fmt(TimeUnit::Microsecond), "1500000.00µs");
        assert_eq!(format_time(1.5, TimeUnit::Minute), "1.50min");
        assert_eq!(format_time(0.0, TimeUnit::Nanosecond), "0.00ns");
        assert_eq!(format_time(0.126, TimeUnit::Hour), "0.13hr");
    }

    #[test]
    fn test_rate() {
        assert_eq!(rate(10, Duration::from_secs(2), TimeUnit::Second), 5.0);
        assert_eq!(rate(10, Duration::from_secs(2), TimeUnit::Millisecond), 0.005);
        assert_eq!(rate(30, Duration::from_secs(60), TimeUnit::Minute), 30.0);
    }

    #[test]
    fn test_rate_zero_elapsed() {
        assert_eq!(rate(10, Duration::ZERO, TimeUnit::Second), 0.0);
        assert_eq!(rate(0, Duration::ZERO, TimeUnit::Hour), 0.0);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(42.5, "file", TimeUnit::Second), "42.50 file/s");
        assert_eq!(format_rate(0.0, "loop", TimeUnit::Millisecond), "0.00 loop/ms");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(857, "K"), "857K");
        assert_eq!(format_count(0, ""), "0");
    }
}
