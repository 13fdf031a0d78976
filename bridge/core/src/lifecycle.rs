//! Statusline Mirroring Lifecycle
//!
//! The controller owns the enable/disable state of statusline mirroring and
//! turns bursts of host change notifications into single, trailing-edge
//! updates.
//!
//! # State Machine
//!
//! ```text
//!            enable()                         disable()
//! Disabled ───────────► Enabled ─────────────────────────► Disabled
//!    ▲  │ (no-op when                │  notify_change()
//!    │  │  already enabled)          ▼
//!    │  │                      pending_update = schedule(debounce)
//!    │  │                            │  notify_change()  → coalesced
//!    │  │                            ▼
//!    │  │                      on_timer(handle) → evaluate → render → send
//!    └──┘
//! ```
//!
//! # Guarantees
//!
//! - `enable` and `disable` are idempotent; the display mode is captured once
//!   and the host subscription is taken once
//! - a burst of notifications inside one debounce window yields exactly one
//!   update, rendered from the host state at fire time
//! - `disable` cancels the pending deadline, and a deadline delivered anyway
//!   (cancel racing the fire) is discarded by the handle check
//! - evaluation errors clear the mirrored statusline, write errors are logged;
//!   neither reaches the host as an error
//! - `disable` leaves the mirrored content in place; the multiplexer drops it
//!   when the editor process exits

use std::io::Write;

use tracing::{debug, info, warn};

use crate::ansi;
use crate::config::StatuslineConfig;
use crate::host::{StatuslineHost, SubscriptionId};
use crate::protocol::{OscWriter, ProtocolFrame};
use crate::timer::{Timer, TimerHandle};

/// Mirroring state, one per host process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleState<M> {
    enabled: bool,
    saved_display_mode: Option<M>,
    pending_update: Option<TimerHandle>,
    subscription: Option<SubscriptionId>,
}

impl<M> Default for LifecycleState<M> {
    fn default() -> Self {
        Self {
            enabled: false,
            saved_display_mode: None,
            pending_update: None,
            subscription: None,
        }
    }
}

impl<M> LifecycleState<M> {
    /// Whether mirroring is active
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Native display mode captured on enable, restored on disable
    #[must_use]
    pub fn saved_display_mode(&self) -> Option<&M> {
        self.saved_display_mode.as_ref()
    }

    /// Deadline of the update currently waiting out the debounce window
    #[must_use]
    pub fn pending_update(&self) -> Option<TimerHandle> {
        self.pending_update
    }

    /// Host change subscription held while enabled
    #[must_use]
    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }
}

/// Counters for what the controller has done
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Statusline frames sent
    pub updates_sent: u64,
    /// Clear frames sent
    pub clears_sent: u64,
    /// Notifications folded into an already pending update
    pub coalesced: u64,
    /// Frames lost to write errors
    pub write_failures: u64,
}

/// Mirrors the host's statusline into the multiplexer
pub struct StatuslineController<H: StatuslineHost, T: Timer, W: Write> {
    host: H,
    timer: T,
    writer: OscWriter<W>,
    config: StatuslineConfig,
    state: LifecycleState<H::DisplayMode>,
    stats: UpdateStats,
}

impl<H: StatuslineHost, T: Timer, W: Write> StatuslineController<H, T, W> {
    /// Create a disabled controller
    pub fn new(host: H, timer: T, writer: OscWriter<W>, config: StatuslineConfig) -> Self {
        Self {
            host,
            timer,
            writer,
            config,
            state: LifecycleState::default(),
            stats: UpdateStats::default(),
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> &LifecycleState<H::DisplayMode> {
        &self.state
    }

    /// Whether mirroring is active
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Counters since construction
    #[must_use]
    pub fn stats(&self) -> UpdateStats {
        self.stats
    }

    /// Settings in effect
    #[must_use]
    pub fn config(&self) -> &StatuslineConfig {
        &self.config
    }

    /// The host collaborator
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host collaborator, mutably
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The timer driving the debounce window
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// The timer, mutably (a manual timer is advanced through this)
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Start mirroring
    ///
    /// Returns `false` when already enabled.
    pub fn enable(&mut self) -> bool {
        if self.state.enabled {
            debug!("Statusline mirroring already enabled");
            return false;
        }

        if self.config.suppress_native {
            let current = self.host.display_mode();
            let suppressed = self.host.suppressed_mode();
            debug!(saved = ?current, "Suppressing native statusline");
            self.state.saved_display_mode = Some(current);
            self.host.set_display_mode(suppressed);
        }

        self.state.subscription = Some(self.host.subscribe());
        self.push_update();
        self.state.enabled = true;

        info!(debounce = ?self.config.debounce, "Statusline mirroring enabled");
        true
    }

    /// Stop mirroring
    ///
    /// Returns `false` when already disabled. The mirrored content is left on
    /// the multiplexer side.
    pub fn disable(&mut self) -> bool {
        if !self.state.enabled {
            debug!("Statusline mirroring already disabled");
            return false;
        }

        if let Some(handle) = self.state.pending_update.take() {
            self.timer.cancel(handle);
            debug!(%handle, "Cancelled pending statusline update");
        }
        if let Some(mode) = self.state.saved_display_mode.take() {
            debug!(restored = ?mode, "Restoring native statusline");
            self.host.set_display_mode(mode);
        }
        if let Some(subscription) = self.state.subscription.take() {
            self.host.unsubscribe(subscription);
        }
        self.state.enabled = false;

        info!("Statusline mirroring disabled");
        true
    }

    /// Flip between enabled and disabled; returns the new state
    pub fn toggle(&mut self) -> bool {
        if self.state.enabled {
            self.disable();
        } else {
            self.enable();
        }
        self.state.enabled
    }

    /// Record that something shown in the statusline changed
    ///
    /// Schedules one update after the debounce window unless one is already
    /// pending.
    pub fn notify_change(&mut self) {
        if !self.state.enabled {
            return;
        }
        if self.state.pending_update.is_some() {
            self.stats.coalesced += 1;
            debug!("Statusline update already pending, coalescing");
            return;
        }

        let handle = self.timer.schedule(self.config.debounce);
        self.state.pending_update = Some(handle);
        debug!(%handle, "Scheduled statusline update");
    }

    /// Deliver a fired deadline
    ///
    /// Returns `true` when an update was performed. Deadlines that are no
    /// longer pending, or that arrive after `disable`, are ignored.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if !self.state.enabled || self.state.pending_update != Some(handle) {
            debug!(%handle, "Ignoring stale statusline deadline");
            return false;
        }

        self.state.pending_update = None;
        self.push_update();
        true
    }

    /// Update immediately, dropping any pending deadline
    ///
    /// Returns `false` when disabled.
    pub fn refresh_now(&mut self) -> bool {
        if !self.state.enabled {
            return false;
        }
        if let Some(handle) = self.state.pending_update.take() {
            self.timer.cancel(handle);
        }
        self.push_update();
        true
    }

    /// Send a clear frame, whatever the current state
    ///
    /// Returns `false` if the frame could not be written.
    pub fn clear(&mut self) -> bool {
        self.send(&ProtocolFrame::statusline_clear())
    }

    /// Evaluate, render and send the statusline
    fn push_update(&mut self) {
        let frame = match self.host.evaluate(self.config.template.as_deref()) {
            Ok(line) => ProtocolFrame::statusline(ansi::render(&line)),
            Err(e) => {
                warn!(error = %e, "Statusline evaluation failed, clearing");
                ProtocolFrame::statusline_clear()
            }
        };
        self.send(&frame);
    }

    fn send(&mut self, frame: &ProtocolFrame) -> bool {
        match self.writer.send(frame) {
            Ok(()) => {
                if frame.payload.is_some() {
                    self.stats.updates_sent += 1;
                } else {
                    self.stats.clears_sent += 1;
                }
                true
            }
            Err(e) => {
                self.stats.write_failures += 1;
                warn!(error = %e, "Dropping statusline frame");
                false
            }
        }
    }
}
