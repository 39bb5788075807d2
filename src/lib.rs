//! A drop-in range iterator that draws a progress bar while you loop over it.
//!
//! ```rust,no_run
//! for i in nrange::nrange(1_000).unwrap() {
//!     // ... work on i ...
//! #   let _ = i;
//! }
//! ```
//!
//! Use [`ProgressRange::builder`] to configure the description, bar and units.

pub use error::{Error, Result};
pub use progress_bar::ProgressBarChars;
pub use range::{Bounds, ProgressRange, ProgressRangeBuilder, nrange};

mod error;
pub mod progress;
mod progress_bar;
mod range;
