//! Frame Writer
//!
//! The terminal output stream is shared between the navigator, the statusline
//! controller and the host editor's own output. Each frame is serialised fully
//! in memory and handed to the sink with a single `write_all` followed by an
//! immediate `flush`, while holding the sink lock, so a frame is never split
//! by another writer and never sits in a buffer behind later host output.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::frame::{FrameKind, ProtocolFrame};
use super::ProtocolError;

/// Cloneable handle to the shared raw output sink
pub struct OscWriter<W: Write> {
    sink: Arc<Mutex<W>>,
}

impl<W: Write> Clone for OscWriter<W> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl OscWriter<io::Stdout> {
    /// Writer over the process's standard output
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OscWriter<W> {
    /// Wrap an arbitrary sink
    pub fn new(sink: W) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    /// Serialise `frame` and deliver it in one write-and-flush
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Io` if the sink rejects the write or the flush.
    /// Nothing is retried; callers treat the frame as lost.
    pub fn send(&self, frame: &ProtocolFrame) -> Result<(), ProtocolError> {
        let bytes = frame.encode();
        let mut sink = self.sink.lock();

        sink.write_all(&bytes).map_err(|source| ProtocolError::Io {
            command: frame.kind.command_name(),
            source,
        })?;
        sink.flush().map_err(|source| ProtocolError::Io {
            command: frame.kind.command_name(),
            source,
        })?;

        trace!(
            command = frame.kind.command_name(),
            clear = frame.kind == FrameKind::StatuslineClear,
            bytes = bytes.len(),
            "Frame written"
        );
        Ok(())
    }

    /// Run `f` against the underlying sink while holding the lock
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.sink.lock())
    }
}
