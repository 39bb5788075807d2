//! Error types for the nrange library.
//!
//! This module provides the [`Error`] enum and [`Result`] type alias used
//! throughout the library for error handling.

use thiserror::Error;

/// Error type for nrange operations.
///
/// Argument errors are raised while a [`ProgressRange`](crate::ProgressRange) is
/// being built, before any background rendering starts.
#[derive(Error, Debug)]
pub enum Error {
    /// A construction parameter was rejected (zero step, unknown time unit, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An I/O error occurred (e.g., writing to terminal or spawning the renderer).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A frame could not be serialized to the trace log.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for nrange operations.
///
/// This is defined as `std::result::Result<T, nrange::Error>` for convenience.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
