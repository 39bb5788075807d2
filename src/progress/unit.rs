//! Time units accepted for elapsed/estimated time and rate display.

use std::str::FromStr;
use std::time::Duration;

use strum::{EnumIter, IntoEnumIterator};

use crate::{Error, Result};

/// Unit used to display elapsed time, estimated time and throughput.
///
/// Parses from either the abbreviated or the long label (`"ms"` or
/// `"millisecond"`) and always displays the abbreviated one.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::EnumString, strum::Display,
)]
pub enum TimeUnit {
    #[default]
    #[strum(to_string = "s", serialize = "second")]
    Second,
    #[strum(to_string = "ms", serialize = "millisecond")]
    Millisecond,
    #[strum(to_string = "µs", serialize = "microsecond")]
    Microsecond,
    #[strum(to_string = "ns", serialize = "nanosecond")]
    Nanosecond,
    #[strum(to_string = "min", serialize = "minute")]
    Minute,
    #[strum(to_string = "hr", serialize = "hour")]
    Hour,
}

impl TimeUnit {
    /// Parses a time unit label, rejecting anything outside the recognized set.
    pub fn parse(label: &str) -> Result<Self> {
        Self::from_str(label).map_err(|_| {
            let known = Self::iter().map(|u| u.to_string()).collect::<Vec<_>>();
            Error::invalid(format!(
                "unrecognized time unit {label:?} (expected one of {})",
                known.join(", ")
            ))
        })
    }

    /// Expresses `d` as a fractional amount of this unit.
    pub fn convert(self, d: Duration) -> f64 {
        let secs = d.as_secs_f64();
        match self {
            Self::Second => secs,
            Self::Millisecond => secs * 1e3,
            Self::Microsecond => secs * 1e6,
            Self::Nanosecond => d.as_nanos() as f64,
            Self::Minute => secs / 60.0,
            Self::Hour => secs / 3600.0,
        }
    }
}
