//! Directional Navigation
//!
//! A navigation request is resolved inside the editor first. Only when the
//! editor has no window in that direction does the request go out to the
//! multiplexer as a `navigate` frame, which lets a single key binding move
//! across editor windows and multiplexer panes alike.
//!
//! ```text
//! key press ─► Navigator ─► WindowGraph::neighbor(dir)
//!                               │
//!                 distinct id ──┴── same id / error
//!                      │                  │
//!             WindowGraph::focus     OSC 51 navigate frame
//! ```
//!
//! Failures fail open: when the window graph cannot be queried or refuses the
//! focus change, the request is forwarded.

use std::io::Write;

use tracing::{debug, warn};

use crate::config::NavigationConfig;
use crate::direction::Direction;
use crate::host::{WindowGraph, WindowId};
use crate::protocol::{OscWriter, ProtocolFrame};

/// What a navigation request ended up doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigateOutcome {
    /// Focus moved to another editor window
    FocusedLocal(WindowId),
    /// A `navigate` frame was sent to the multiplexer
    ForwardedToMultiplexer,
    /// The frame could not be written; the request is dropped
    ForwardFailed,
    /// The direction is not bound in configuration
    Unbound,
}

/// Resolves navigation requests against the editor, then the multiplexer
pub struct Navigator<W: Write> {
    config: NavigationConfig,
    writer: OscWriter<W>,
}

impl<W: Write> Navigator<W> {
    /// Create a navigator writing fallback frames to `writer`
    pub fn new(config: NavigationConfig, writer: OscWriter<W>) -> Self {
        Self { config, writer }
    }

    /// Navigation settings in effect
    #[must_use]
    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Move focus in `direction`, inside the editor when possible
    pub fn navigate<G: WindowGraph>(&self, graph: &mut G, direction: Direction) -> NavigateOutcome {
        if !self.config.is_bound(direction) {
            debug!(%direction, "Direction not bound, ignoring");
            return NavigateOutcome::Unbound;
        }

        if let Some(target) = local_neighbor(graph, direction) {
            match graph.focus(target) {
                Ok(()) => {
                    debug!(%direction, window = %target, "Focused neighbouring window");
                    return NavigateOutcome::FocusedLocal(target);
                }
                Err(e) => {
                    debug!(%direction, window = %target, error = %e, "Focus change failed, forwarding");
                }
            }
        }

        self.forward(direction)
    }

    /// Send a `navigate` frame without consulting the editor
    pub fn forward(&self, direction: Direction) -> NavigateOutcome {
        match self.writer.send(&ProtocolFrame::navigate(direction)) {
            Ok(()) => {
                debug!(%direction, "Forwarded navigation to multiplexer");
                NavigateOutcome::ForwardedToMultiplexer
            }
            Err(e) => {
                warn!(%direction, error = %e, "Failed to forward navigation");
                NavigateOutcome::ForwardFailed
            }
        }
    }
}

/// Neighbouring window in `direction`, `None` when there is none or the
/// graph could not be queried
fn local_neighbor<G: WindowGraph>(graph: &G, direction: Direction) -> Option<WindowId> {
    let current = match graph.current() {
        Ok(id) => id,
        Err(e) => {
            debug!(error = %e, "Current window query failed, treating as no neighbour");
            return None;
        }
    };
    let neighbor = match graph.neighbor(direction) {
        Ok(id) => id,
        Err(e) => {
            debug!(%direction, error = %e, "Neighbour query failed, treating as no neighbour");
            return None;
        }
    };
    (neighbor != current).then_some(neighbor)
}
