//! Rendering of the single-line progress display.
//!
//! Every [`ProgressRange`](crate::ProgressRange) owns one [`ProgressRenderer`]: a
//! background thread that samples the range's counters on a fixed interval and
//! rewrites the current terminal line in place. The line looks like
//!
//! ```text
//! Copying: 42%|███████████████               | 42/100 [Time elapsed:2.10s, Time estimated:5.00s, 20.00 file/s]
//! ```
//!
//! # Output Modes
//!
//! - [`ProgressOutput::UI`] - the line is rewritten in place (default)
//! - [`ProgressOutput::Text`] - only the first and last lines are printed, each on
//!   its own line
//!
//! ```rust,no_run
//! use nrange::progress::{set_output, ProgressOutput};
//!
//! // Use text mode for CI environments
//! set_output(ProgressOutput::Text);
//! ```
//!
//! # Environment Variables
//!
//! - `NRANGE_NO_PROGRESS=1` - Disable progress display entirely. Ranges still
//!   iterate, but no renderer is started.
//! - `NRANGE_TEXT_MODE=1` - Force text mode regardless of [`set_output`] calls.
//! - `NRANGE_TRACE_LOG=<path>` - Append every rendered frame to `<path>` as a
//!   JSON line, see [`diagnostics`].
//!
//! # Threading Model
//!
//! ```text
//!  consumer thread                         renderer thread
//!  ───────────────                         ───────────────
//!  start() ── first line
//!  next() ── Counters::inc ──┐
//!                            ├── Arc<Counters> ──► sample every interval,
//!  next() ── Counters::inc ──┘                      skip if the terminal is busy
//!  exhausted/dropped ── close channel ── mpsc ────► exit
//!  join() ◄─────────────────────────────────────────┘
//!  final or abandoned line
//! ```
//!
//! The position counter is a single atomic, so a sample is never torn. The
//! owner always joins the thread before drawing the last line itself, so no
//! renderer outlives its range and the last line is never followed by a tick.

pub mod clock;
pub mod diagnostics;
mod format;
#[cfg(feature = "log")]
mod log;
mod output;
pub mod render;
mod renderer;
mod state;
mod unit;

pub use clock::{Clock, ManualClock, SystemClock};
pub use format::{format_count, format_rate, format_time, rate};
#[cfg(feature = "log")]
pub use log::{
    ProgressLogger, init_log_integration, init_log_integration_with_level,
    try_init_log_integration, try_init_log_integration_with_level,
};
pub use output::{ProgressOutput, output, set_output};
pub use renderer::{Counters, MIN_INTERVAL, ProgressRenderer, RendererStatus};
pub(crate) use renderer::Target;
pub use state::{active_renderers, interval, is_disabled, set_interval, with_terminal_lock};
pub use unit::TimeUnit;

#[cfg(test)]
pub(crate) use renderer::Capture;
#[cfg(test)]
pub(crate) use state::force_disabled;
