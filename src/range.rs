//! The range iterator and its builder.

use std::fmt;
use std::io::Write;
use std::iter::FusedIterator;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use crate::progress::render::LineConfig;
use crate::progress::{
    Clock, Counters, ProgressOutput, ProgressRenderer, RendererStatus, SystemClock, Target,
    TimeUnit, interval, is_disabled, output,
};
use crate::progress_bar::{DEFAULT_FILL, ProgressBarChars};
use crate::{Error, Result};

/// Start, stop and step of an arithmetic range, `start` inclusive, `stop` exclusive.
///
/// Converts from the same shapes `range()` accepts: a stop alone, `(start, stop)`,
/// `(start, stop, step)`, or a `start..stop` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl Bounds {
    /// Number of values the range yields, or an error if `step` is zero.
    pub fn count(&self) -> Result<u64> {
        if self.step == 0 {
            return Err(Error::invalid("step must not be zero"));
        }
        let span = self.stop as i128 - self.start as i128;
        let step = self.step as i128;
        if span == 0 || (span > 0) != (step > 0) {
            return Ok(0);
        }
        let (span, step) = (span.abs(), step.abs());
        Ok(((span + step - 1) / step) as u64)
    }
}

impl From<i64> for Bounds {
    fn from(stop: i64) -> Self {
        Self {
            start: 0,
            stop,
            step: 1,
        }
    }
}

impl From<(i64, i64)> for Bounds {
    fn from((start, stop): (i64, i64)) -> Self {
        Self {
            start,
            stop,
            step: 1,
        }
    }
}

impl From<(i64, i64, i64)> for Bounds {
    fn from((start, stop, step): (i64, i64, i64)) -> Self {
        Self { start, stop, step }
    }
}

impl From<Range<i64>> for Bounds {
    fn from(range: Range<i64>) -> Self {
        (range.start, range.end).into()
    }
}

/// Builder for a [`ProgressRange`].
///
/// Nothing is validated or drawn until [`start`](Self::start).
#[must_use]
pub struct ProgressRangeBuilder {
    bounds: Bounds,
    description: String,
    bar_len: usize,
    bar_char: String,
    loop_append: String,
    unit: String,
    time_unit: String,
    interval: Option<Duration>,
    output: Option<ProgressOutput>,
    clock: Arc<dyn Clock>,
    target: Option<Box<dyn Write + Send>>,
}

impl fmt::Debug for ProgressRangeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressRangeBuilder")
            .field("bounds", &self.bounds)
            .field("description", &self.description)
            .field("bar_len", &self.bar_len)
            .field("bar_char", &self.bar_char)
            .field("loop_append", &self.loop_append)
            .field("unit", &self.unit)
            .field("time_unit", &self.time_unit)
            .field("interval", &self.interval)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl ProgressRangeBuilder {
    /// Creates a builder with the default display settings.
    pub fn new(bounds: impl Into<Bounds>) -> Self {
        Self {
            bounds: bounds.into(),
            description: String::new(),
            bar_len: 35,
            bar_char: DEFAULT_FILL.to_string(),
            loop_append: String::new(),
            unit: "loop".to_string(),
            time_unit: TimeUnit::default().to_string(),
            interval: None,
            output: None,
            clock: Arc::new(SystemClock),
            target: None,
        }
    }

    /// Text printed before the percentage.
    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    /// Width of the bar in characters (default 35).
    pub fn bar_len(mut self, bar_len: usize) -> Self {
        self.bar_len = bar_len;
        self
    }

    /// Glyph filling the completed part of the bar (default "█").
    pub fn bar_char<S: Into<String>>(mut self, bar_char: S) -> Self {
        self.bar_char = bar_char.into();
        self
    }

    /// Suffix appended to both counts, e.g. "K" for "857K/857K".
    pub fn loop_append<S: Into<String>>(mut self, loop_append: S) -> Self {
        self.loop_append = loop_append.into();
        self
    }

    /// Name of one item in the rate, e.g. "file" for "file/s" (default "loop").
    pub fn unit<S: Into<String>>(mut self, unit: S) -> Self {
        self.unit = unit.into();
        self
    }

    /// Time unit label, see [`TimeUnit`] for the accepted values (default "s").
    pub fn time_unit<S: ToString>(mut self, time_unit: S) -> Self {
        self.time_unit = time_unit.to_string();
        self
    }

    /// Redraw interval; defaults to [`interval()`](crate::progress::interval).
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Output mode; defaults to [`output()`](crate::progress::output).
    pub fn output(mut self, output: ProgressOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Clock used for elapsed time.
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Writes the status line to `target` instead of stderr.
    pub fn target<W: Write + Send + 'static>(mut self, target: W) -> Self {
        self.target = Some(Box::new(target));
        self
    }

    /// Validates the configuration, draws the first line and starts the renderer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a zero step, an unknown time unit, a zero
    /// bar length or a bar glyph that is not one column wide. These are checked
    /// before anything is drawn or spawned. [`Error::Io`] if the first line cannot
    /// be written or the thread cannot be spawned.
    pub fn start(self) -> Result<ProgressRange> {
        let total = self.bounds.count()?;
        let time_unit = TimeUnit::parse(&self.time_unit)?;
        if self.bar_len == 0 {
            return Err(Error::invalid("bar_len must be positive"));
        }
        let chars = ProgressBarChars::with_fill(self.bar_char)?;

        let counters = Arc::new(Counters::new(total));
        let renderer = if is_disabled() {
            None
        } else {
            let config = LineConfig {
                description: self.description,
                bar_len: self.bar_len,
                chars,
                loop_append: self.loop_append,
                unit: self.unit,
                time_unit,
            };
            let target = match self.target {
                Some(w) => Target::Writer(w),
                None => Target::Stderr,
            };
            let mut renderer = ProgressRenderer::new(
                counters.clone(),
                config,
                self.clock,
                self.output.unwrap_or_else(output),
                self.interval.unwrap_or_else(interval),
                target,
            );
            renderer.start()?;
            Some(renderer)
        };

        Ok(ProgressRange {
            bounds: self.bounds,
            next: self.bounds.start,
            remaining: total,
            counters,
            renderer,
        })
    }
}

/// A range of integers that reports its progress on the terminal while consumed.
///
/// Yields the same values as `start..stop` stepped by `step`. Each call to
/// `next` advances the shared counter the renderer samples; the call that finds
/// the range exhausted blocks until the final 100% line is written. Dropping the
/// range early stops the renderer as well.
///
/// ```rust,no_run
/// use nrange::ProgressRange;
///
/// let files = ProgressRange::builder((0, 500, 5))
///     .description("Copying: ")
///     .unit("file")
///     .time_unit("ms")
///     .start()?;
/// for i in files {
///     // ...
/// #   let _ = i;
/// }
/// # Ok::<(), nrange::Error>(())
/// ```
pub struct ProgressRange {
    bounds: Bounds,
    next: i64,
    remaining: u64,
    counters: Arc<Counters>,
    renderer: Option<ProgressRenderer>,
}

impl fmt::Debug for ProgressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressRange")
            .field("bounds", &self.bounds)
            .field("next", &self.next)
            .field("remaining", &self.remaining)
            .field("position", &self.counters.position())
            .field("renderer", &self.renderer_status())
            .finish()
    }
}

impl ProgressRange {
    /// Starts configuring a range over `bounds`.
    pub fn builder(bounds: impl Into<Bounds>) -> ProgressRangeBuilder {
        ProgressRangeBuilder::new(bounds)
    }

    /// The start, stop and step this range was built with.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of values the range yields in total, fixed at construction.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.counters.total()
    }

    /// Number of values produced so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.counters.position()
    }

    /// Returns `true` once every value has been produced.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// State of the renderer, or `None` when progress display is disabled.
    #[must_use]
    pub fn renderer_status(&self) -> Option<RendererStatus> {
        self.renderer.as_ref().map(ProgressRenderer::status)
    }
}

impl Iterator for ProgressRange {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.remaining == 0 {
            if let Some(renderer) = &mut self.renderer {
                renderer.finish();
            }
            return None;
        }
        let value = self.next;
        self.remaining -= 1;
        self.next = self.next.saturating_add(self.bounds.step);
        self.counters.inc();
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for ProgressRange {}

/// Builds a [`ProgressRange`] over `bounds` with the default display settings.
///
/// # Errors
///
/// See [`ProgressRangeBuilder::start`].
pub fn nrange(bounds: impl Into<Bounds>) -> Result<ProgressRange> {
    ProgressRange::builder(bounds).start()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{Capture, ManualClock, force_disabled};

    fn quiet(bounds: impl Into<Bounds>) -> ProgressRangeBuilder {
        ProgressRange::builder(bounds)
            .output(ProgressOutput::UI)
            .interval(Duration::from_secs(3600))
            .clock(ManualClock::new())
            .target(Capture::default())
    }

    #[test]
    fn test_bounds_from() {
        let bounds = |start, stop, step| Bounds { start, stop, step };
        assert_eq!(Bounds::from(5), bounds(0, 5, 1));
        assert_eq!(Bounds::from((2, 5)), bounds(2, 5, 1));
        assert_eq!(Bounds::from((10, 0, -3)), bounds(10, 0, -3));
        assert_eq!(Bounds::from(1..4), bounds(1, 4, 1));
    }

    #[test]
    fn test_bounds_count() {
        assert_eq!(Bounds::from(5).count().unwrap(), 5);
        assert_eq!(Bounds::from((0, 0)).count().unwrap(), 0);
        assert_eq!(Bounds::from((5, 0)).count().unwrap(), 0);
        assert_eq!(Bounds::from((0, 10, 3)).count().unwrap(), 4);
        assert_eq!(Bounds::from((10, 0, -3)).count().unwrap(), 4);
        assert_eq!(Bounds::from((0, 10, -1)).count().unwrap(), 0);
        assert_eq!(Bounds::from((-5, 5, 5)).count().unwrap(), 2);
        assert_eq!(Bounds::from((i64::MIN, i64::MAX)).count().unwrap(), u64::MAX);
        assert!(matches!(
            Bounds::from((0, 10, 0)).count(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_total_count_matches_iteration() {
        let cases: [(i64, i64, i64); 10] = [
            (0, 10, 1),
            (0, 10, 3),
            (10, 0, -1),
            (10, 0, -4),
            (-7, 7, 2),
            (3, 3, 1),
            (3, 3, -1),
            (5, 1, 1),
            (1, 5, -1),
            (-20, -3, 6),
        ];
        for (start, stop, step) in cases {
            let range = quiet((start, stop, step)).start().unwrap();
            let total = range.total_count();
            let values = range.collect::<Vec<_>>();
            let expected = (start..stop)
                .step_by(step.unsigned_abs() as usize)
                .collect::<Vec<_>>();
            if step > 0 {
                assert_eq!(values, expected, "({start}, {stop}, {step})");
            }
            assert_eq!(total, values.len() as u64, "({start}, {stop}, {step})");
        }
    }

    #[test]
    fn test_negative_step_values() {
        let values = quiet((10, 0, -3)).start().unwrap().collect::<Vec<_>>();
        assert_eq!(values, vec![10, 7, 4, 1]);
    }

    #[test]
    fn test_not_restartable() {
        let mut range = quiet(3).start().unwrap();
        assert_eq!(range.by_ref().count(), 3);
        assert!(range.is_exhausted());
        assert_eq!(range.next(), None);
        assert_eq!(range.next(), None);
        assert_eq!(range.renderer_status(), Some(RendererStatus::Stopped));
    }

    #[test]
    fn test_position_and_size_hint() {
        let mut range = quiet((0, 6, 2)).start().unwrap();
        assert_eq!(range.size_hint(), (3, Some(3)));
        assert_eq!(range.next(), Some(0));
        assert_eq!(range.position(), 1);
        assert_eq!(range.size_hint(), (2, Some(2)));
        assert_eq!(range.renderer_status(), Some(RendererStatus::Running));
    }

    #[test]
    fn test_invalid_arguments() {
        let step = quiet((0, 10, 0)).start().unwrap_err();
        assert!(matches!(step, Error::InvalidArgument(_)));

        let unit = quiet(10).time_unit("fortnight").start().unwrap_err();
        assert!(matches!(unit, Error::InvalidArgument(_)));

        let bar = quiet(10).bar_len(0).start().unwrap_err();
        assert!(matches!(bar, Error::InvalidArgument(_)));

        let glyph = quiet(10).bar_char("##").start().unwrap_err();
        assert!(matches!(glyph, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_time_unit_accepts_enum() {
        let range = quiet(1).time_unit(TimeUnit::Microsecond).start().unwrap();
        assert_eq!(range.total_count(), 1);
    }

    #[test]
    fn test_disabled_range_iterates_without_renderer() {
        let capture = Capture::default();
        force_disabled(true);
        let started = quiet((0, 10, 2)).target(capture.clone()).start();
        force_disabled(false);

        let mut range = started.unwrap();
        assert_eq!(range.renderer_status(), None);
        assert_eq!(range.total_count(), 5);
        assert_eq!(range.by_ref().collect::<Vec<_>>(), vec![0, 2, 4, 6, 8]);
        assert!(range.is_exhausted());
        assert_eq!(range.renderer_status(), None);
        drop(range);
        assert!(capture.contents().is_empty());
    }

    #[test]
    fn test_disabled_range_still_validates() {
        force_disabled(true);
        let err = quiet((0, 10, 0)).start().unwrap_err();
        force_disabled(false);
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
