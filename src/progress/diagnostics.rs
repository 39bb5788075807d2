//! Diagnostic frame logging for debugging progress display.
//!
//! When enabled via the `NRANGE_TRACE_LOG` environment variable, this module logs
//! each rendered frame as JSONL with the rendered text and the numbers behind it.

use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::Result;

use super::render::Frame;

static LOG_WRITER: OnceLock<Option<Mutex<LineWriter<File>>>> = OnceLock::new();

fn get_log_writer() -> Option<&'static Mutex<LineWriter<File>>> {
    LOG_WRITER
        .get_or_init(|| {
            std::env::var("NRANGE_TRACE_LOG").ok().and_then(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .ok()
                    .map(|file| Mutex::new(LineWriter::new(file)))
            })
        })
        .as_ref()
}

/// Returns true if frame logging is enabled.
pub fn is_enabled() -> bool {
    get_log_writer().is_some()
}

/// Appends `frame` to the trace log, if one is configured.
pub(crate) fn log_frame(frame: &Frame) -> Result<()> {
    let Some(writer) = get_log_writer() else {
        return Ok(());
    };
    write_frame(&mut *writer.lock().unwrap_or_else(PoisonError::into_inner), frame)
}

fn write_frame(writer: &mut impl Write, frame: &Frame) -> Result<()> {
    let json = serde_json::to_string(frame)?;
    writeln!(writer, "{json}")?;
    Ok(())
}
