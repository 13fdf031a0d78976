//! OSC 51 Protocol Layer
//!
//! Builds command frames for the multiplexer and writes them to the shared
//! terminal output stream.
//!
//! - [`frame`]: byte-exact frame construction (and stream splitting for tests)
//! - [`writer`]: atomic write-and-flush onto the shared sink

pub mod frame;
pub mod writer;

use thiserror::Error;

pub use frame::{FrameKind, PayloadEncoding, ProtocolFrame, WireFrame};
pub use writer::OscWriter;

/// Errors raised while delivering a frame
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The output sink rejected the write or the flush
    #[error("failed to write {command} frame: {source}")]
    Io {
        /// Command name of the frame that was lost
        command: &'static str,
        /// The underlying IO error
        source: std::io::Error,
    },
}
