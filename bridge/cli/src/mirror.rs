//! Statusline Mirror Loop
//!
//! Reads newline-delimited `RenderedLine` documents and mirrors them into the
//! multiplexer through a [`StatuslineController`]. Every line counts as one
//! change notification, so a producer may write as often as it likes: bursts
//! inside the debounce window collapse into one frame.
//!
//! ```text
//! input lines ──► StdinHost::receive ──► notify_change ──► TokioTimer
//!                                                              │
//!                        on_timer(handle) ◄── FiredTimers ◄────┘
//! ```
//!
//! On end of input the pending update is sent at once and mirroring is
//! disabled.

use std::io::Write;

use anyhow::{Context, Result};
use muxbridge_core::{OscWriter, StatuslineConfig, StatuslineController, TokioTimer, UpdateStats};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::host::StdinHost;

/// Mirror `input` until it ends
///
/// # Errors
///
/// Returns an error only when reading `input` fails. Write failures and bad
/// documents are absorbed by the controller.
pub async fn run<R, W>(input: R, writer: OscWriter<W>, config: StatuslineConfig) -> Result<UpdateStats>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (timer, mut fired) = TokioTimer::new();
    let mut controller = StatuslineController::new(StdinHost::new(), timer, writer, config);
    controller.enable();

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read statusline input")? {
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => {
                        controller.host_mut().receive(&line);
                        controller.notify_change();
                    }
                    None => break,
                }
            }
            Some(handle) = fired.recv() => {
                controller.on_timer(handle);
            }
        }
    }

    if controller.state().pending_update().is_some() {
        debug!("Input closed with an update pending, flushing");
        controller.refresh_now();
    }
    controller.disable();

    let stats = controller.stats();
    info!(
        lines = controller.host().lines_received(),
        updates = stats.updates_sent,
        clears = stats.clears_sent,
        coalesced = stats.coalesced,
        write_failures = stats.write_failures,
        "Statusline input closed"
    );
    Ok(stats)
}
