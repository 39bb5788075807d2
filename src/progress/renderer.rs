//! The background thread that keeps the status line up to date.
//!
//! A [`ProgressRenderer`] owns exactly one thread. The thread samples the shared
//! [`Counters`] every interval and rewrites the line in place until its channel
//! closes. The first and last lines are drawn by the owner, on its own thread:
//! once [`ProgressRenderer::finish`] or [`ProgressRenderer::abandon`] returns, the
//! thread has been joined, the last line has been written and nothing else will be.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::Result;

use super::clock::Clock;
use super::diagnostics;
use super::output::ProgressOutput;
use super::render::{LineConfig, Snapshot, render};
use super::state::{lock_terminal, renderer_started, renderer_stopped, try_lock_terminal};

/// Shortest redraw interval accepted; anything lower would spin.
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Progress counters shared between a range and its renderer.
///
/// Only the range advances them; the renderer reads.
#[derive(Debug)]
pub struct Counters {
    position: AtomicU64,
    total: u64,
}

impl Counters {
    pub(crate) fn new(total: u64) -> Self {
        Self {
            position: AtomicU64::new(0),
            total,
        }
    }

    /// Number of values produced so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position.load(Ordering::Acquire)
    }

    /// Number of values the range yields in total.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    pub(crate) fn inc(&self) {
        self.position.fetch_add(1, Ordering::Release);
    }
}

/// Lifecycle of a renderer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::EnumIs)]
pub enum RendererStatus {
    /// Configured but not started.
    #[default]
    Idle,
    /// The background thread is redrawing.
    Running,
    /// The thread has exited and the last line was written.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawKind {
    /// The first line, drawn by the owner on start.
    First,
    /// A periodic redraw from the background thread.
    Tick,
    /// The range is exhausted: a complete bar.
    Final,
    /// The range was dropped early: the real progress.
    Abandoned,
}

/// Where frames are written.
pub(crate) enum Target {
    /// The shared stderr terminal.
    Stderr,
    Writer(Box<dyn Write + Send>),
}

/// Line state shared by the owner and the background thread.
struct Painter {
    counters: Arc<Counters>,
    config: LineConfig,
    clock: Arc<dyn Clock>,
    start: Instant,
    output: ProgressOutput,
    target: Target,
    /// Display width of the last in-place line, used to blank leftovers.
    last_width: usize,
    reported: bool,
}

impl Painter {
    /// Draws one frame under the terminal lock.
    ///
    /// Ticks never wait for the lock: while someone else holds it the tick is
    /// skipped. Every other frame waits, unless this thread already holds the
    /// lock through [`with_terminal_lock`](super::with_terminal_lock).
    fn draw(&mut self, kind: DrawKind) -> Result<()> {
        let _guard = match kind {
            DrawKind::Tick => match try_lock_terminal() {
                Some(guard) => Some(guard),
                None => return Ok(()),
            },
            DrawKind::First | DrawKind::Final | DrawKind::Abandoned => lock_terminal(),
        };

        let now = self.clock.now();
        let snapshot = Snapshot {
            current: self.counters.position(),
            total: self.counters.total(),
            elapsed: now.saturating_duration_since(self.start),
            complete: kind == DrawKind::Final,
        };
        let frame = render(&self.config, &snapshot);
        diagnostics::log_frame(&frame)?;

        let text = match self.output {
            ProgressOutput::Text => format!("{}\n", frame.line),
            ProgressOutput::UI => {
                let width = console::measure_text_width(&frame.line);
                let pad = " ".repeat(self.last_width.saturating_sub(width));
                self.last_width = width;
                let eol = match kind {
                    DrawKind::First | DrawKind::Tick => "",
                    DrawKind::Final | DrawKind::Abandoned => "\n",
                };
                format!("\r{}{}{}", frame.line, pad, eol)
            }
        };

        match &mut self.target {
            Target::Stderr => {
                let mut term = super::state::term();
                term.write_all(text.as_bytes())?;
                term.flush()?;
            }
            Target::Writer(w) => {
                w.write_all(text.as_bytes())?;
                w.flush()?;
            }
        }
        Ok(())
    }

    /// Reports the first failed draw to stderr and keeps going.
    fn draw_or_report(&mut self, kind: DrawKind) {
        if let Err(err) = self.draw(kind) {
            if !self.reported {
                self.reported = true;
                eprintln!("nrange: {err:?}");
            }
        }
    }
}

/// Locks the painter, taking it over if a panicking tick poisoned it.
fn lock_painter(painter: &Mutex<Painter>) -> MutexGuard<'_, Painter> {
    painter.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Redraws on every timeout until the owner closes the channel.
fn run(painter: &Mutex<Painter>, rx: &mpsc::Receiver<()>, interval: Duration) {
    while let Err(RecvTimeoutError::Timeout) = rx.recv_timeout(interval) {
        let mut painter = lock_painter(painter);
        if painter.output == ProgressOutput::UI {
            painter.draw_or_report(DrawKind::Tick);
        }
    }
}

/// Handle to the background thread drawing one range's status line.
///
/// Dropping a running renderer abandons it: the thread is joined and the
/// progress reached so far is drawn before `drop` returns.
pub struct ProgressRenderer {
    status: RendererStatus,
    painter: Arc<Mutex<Painter>>,
    interval: Duration,
    tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
    on_stderr: bool,
}

impl ProgressRenderer {
    pub(crate) fn new(
        counters: Arc<Counters>,
        config: LineConfig,
        clock: Arc<dyn Clock>,
        output: ProgressOutput,
        interval: Duration,
        target: Target,
    ) -> Self {
        let on_stderr = matches!(target, Target::Stderr);
        let start = clock.now();
        Self {
            status: RendererStatus::Idle,
            painter: Arc::new(Mutex::new(Painter {
                counters,
                config,
                clock,
                start,
                output,
                target,
                last_width: 0,
                reported: false,
            })),
            interval: interval.max(MIN_INTERVAL),
            tx: None,
            handle: None,
            on_stderr,
        }
    }

    /// Draws the initial line and spawns the redraw thread.
    ///
    /// The first line is written on the caller's thread so that a failing target
    /// is reported here, before any thread exists.
    pub(crate) fn start(&mut self) -> Result<()> {
        if !self.status.is_idle() {
            return Ok(());
        }
        lock_painter(&self.painter).draw(DrawKind::First)?;

        let (tx, rx) = mpsc::channel();
        let painter = Arc::clone(&self.painter);
        let interval = self.interval;
        let handle = thread::Builder::new()
            .name("nrange-renderer".into())
            .spawn(move || run(&painter, &rx, interval))?;

        if self.on_stderr {
            renderer_started(self.inline());
        }
        self.tx = Some(tx);
        self.handle = Some(handle);
        self.status = RendererStatus::Running;
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> RendererStatus {
        self.status
    }

    /// Returns `true` while the background thread is redrawing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    /// Stops the thread and draws the complete line.
    ///
    /// Blocks until the final line has been written. Calling it again, or on a
    /// renderer that never started, does nothing.
    pub fn finish(&mut self) {
        self.stop(DrawKind::Final);
    }

    /// Stops the thread, then draws the progress reached so far and ends the line.
    pub fn abandon(&mut self) {
        self.stop(DrawKind::Abandoned);
    }

    /// Whether this renderer rewrites a stderr line in place.
    fn inline(&self) -> bool {
        self.on_stderr && lock_painter(&self.painter).output == ProgressOutput::UI
    }

    fn stop(&mut self, kind: DrawKind) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        drop(self.tx.take());
        if handle.join().is_err() {
            eprintln!("nrange: renderer thread panicked");
        }
        lock_painter(&self.painter).draw_or_report(kind);
        if self.on_stderr {
            renderer_stopped(self.inline());
        }
        self.status = RendererStatus::Stopped;
    }
}

impl Drop for ProgressRenderer {
    fn drop(&mut self) {
        self.abandon();
    }
}

/// In-memory target, shared so tests can read what the renderer wrote.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct Capture(pub Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[cfg(test)]
impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
