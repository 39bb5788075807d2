//! Global state shared by every progress range.
//!
//! This module holds the environment controls, the process-wide defaults and the
//! terminal lock that serializes writes from concurrent renderers.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, OnceLock, PoisonError, TryLockError};
use std::time::Duration;

use console::Term;

// =============================================================================
// Environment Variable Controls
// =============================================================================

static ENV_NO_PROGRESS: OnceLock<bool> = OnceLock::new();
static ENV_TEXT_MODE: OnceLock<bool> = OnceLock::new();

/// Checks if an environment variable is set to a truthy value ("1" or "true").
fn check_env_bool(var_name: &str) -> bool {
    std::env::var(var_name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Returns true if progress display is disabled via `NRANGE_NO_PROGRESS=1` environment variable.
fn env_no_progress() -> bool {
    *ENV_NO_PROGRESS.get_or_init(|| check_env_bool("NRANGE_NO_PROGRESS"))
}

/// Returns true if text mode is forced via `NRANGE_TEXT_MODE=1` environment variable.
pub(crate) fn env_text_mode() -> bool {
    *ENV_TEXT_MODE.get_or_init(|| check_env_bool("NRANGE_TEXT_MODE"))
}

/// Returns whether progress display is currently disabled.
///
/// When disabled, ranges still iterate normally but never spawn a renderer.
#[must_use]
pub fn is_disabled() -> bool {
    #[cfg(test)]
    if FORCE_DISABLED.with(Cell::get) {
        return true;
    }
    env_no_progress()
}

#[cfg(test)]
thread_local! {
    static FORCE_DISABLED: Cell<bool> = const { Cell::new(false) };
}

/// Disables rendering for ranges started on the current thread.
#[cfg(test)]
pub(crate) fn force_disabled(disabled: bool) {
    FORCE_DISABLED.with(|c| c.set(disabled));
}

// =============================================================================
// Global Statics
// =============================================================================

/// Global terminal lock for synchronizing output operations.
///
/// Guards no data, so a poisoned lock is simply taken over.
static TERM_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

thread_local! {
    /// Set while this thread is inside [`with_terminal_lock`].
    static LOCK_HELD: Cell<bool> = const { Cell::new(false) };
}

/// Default redraw interval.
static INTERVAL: Mutex<Duration> = Mutex::new(Duration::from_millis(100));

/// Number of renderers currently drawing to stderr.
static ACTIVE: AtomicUsize = AtomicUsize::new(0);

/// How many of those rewrite the line in place.
static ACTIVE_INLINE: AtomicUsize = AtomicUsize::new(0);

/// Returns a reference to the shared terminal instance.
pub(crate) fn term() -> &'static Term {
    static TERM: LazyLock<Term> = LazyLock::new(Term::stderr);
    &TERM
}

/// Executes a function while holding the global terminal lock.
///
/// Use this to synchronize your own stderr/stdout writes with the progress line
/// to prevent interleaved or corrupted output.
///
/// The lock is reentrant for the calling thread: starting, finishing or
/// dropping a range inside `f` draws without waiting on the lock again.
#[must_use]
pub fn with_terminal_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = lock_terminal();
    let _held = HeldFlag::set();
    f()
}

/// Resets [`LOCK_HELD`] even when the closure unwinds.
struct HeldFlag {
    previous: bool,
}

impl HeldFlag {
    fn set() -> Self {
        Self {
            previous: LOCK_HELD.with(|held| held.replace(true)),
        }
    }
}

impl Drop for HeldFlag {
    fn drop(&mut self) {
        LOCK_HELD.with(|held| held.set(self.previous));
    }
}

/// Takes the terminal lock, blocking until it is free.
///
/// Returns `None` when the current thread already holds it through
/// [`with_terminal_lock`].
pub(crate) fn lock_terminal() -> Option<MutexGuard<'static, ()>> {
    if LOCK_HELD.with(Cell::get) {
        return None;
    }
    Some(TERM_LOCK.lock().unwrap_or_else(PoisonError::into_inner))
}

/// Takes the terminal lock only if nobody holds it.
pub(crate) fn try_lock_terminal() -> Option<MutexGuard<'static, ()>> {
    match TERM_LOCK.try_lock() {
        Ok(guard) => Some(guard),
        Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => None,
    }
}

// =============================================================================
// Interval Configuration
// =============================================================================

/// Returns the default redraw interval.
#[must_use]
pub fn interval() -> Duration {
    *INTERVAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sets the default redraw interval for ranges built afterwards.
pub fn set_interval(interval: Duration) {
    *INTERVAL.lock().unwrap_or_else(PoisonError::into_inner) = interval;
}

// =============================================================================
// Renderer Accounting
// =============================================================================

/// Returns the number of renderers that are currently running.
#[must_use]
pub fn active_renderers() -> usize {
    ACTIVE.load(Ordering::SeqCst)
}

/// Number of running stderr renderers in UI mode, whose line a log message
/// has to clear first.
pub(crate) fn inline_renderers() -> usize {
    ACTIVE_INLINE.load(Ordering::SeqCst)
}

pub(crate) fn renderer_started(inline: bool) {
    ACTIVE.fetch_add(1, Ordering::SeqCst);
    if inline {
        ACTIVE_INLINE.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) fn renderer_stopped(inline: bool) {
    ACTIVE.fetch_sub(1, Ordering::SeqCst);
    if inline {
        ACTIVE_INLINE.fetch_sub(1, Ordering::SeqCst);
    }
}
