//! Host Editor Seams
//!
//! Everything the bridge needs from the editor it runs inside. Focus queries,
//! change notifications, statusline evaluation and the native status bar
//! option all belong to the host; these traits are the only way the core
//! reaches them, which keeps the core testable with in-memory fakes.

use std::fmt;

use thiserror::Error;

use crate::direction::Direction;
use crate::statusline::RenderedLine;

/// Host-assigned window identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "win:{}", self.0)
    }
}

/// Token returned by [`StatuslineHost::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Failures reported by host collaborators
///
/// The bridge never propagates these to the user; each caller has a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host could not answer right now
    #[error("host unavailable: {0}")]
    Unavailable(String),

    /// The host answered with something unusable
    #[error("malformed host response: {0}")]
    Malformed(String),

    /// Statusline template evaluation failed
    #[error("statusline evaluation failed: {0}")]
    Evaluation(String),
}

/// Window layout queries and focus changes
pub trait WindowGraph {
    /// The currently focused window
    ///
    /// # Errors
    ///
    /// Any error makes the navigator forward the request to the multiplexer.
    fn current(&self) -> Result<WindowId, HostError>;

    /// The window adjacent to the focused one in `direction`
    ///
    /// Returns the focused window itself when there is no neighbour.
    ///
    /// # Errors
    ///
    /// Any error is treated exactly like "no neighbour".
    fn neighbor(&self, direction: Direction) -> Result<WindowId, HostError>;

    /// Move focus to `window`
    ///
    /// # Errors
    ///
    /// A failed focus change makes the navigator forward the request instead.
    fn focus(&mut self, window: WindowId) -> Result<(), HostError>;
}

/// Everything the statusline controller consumes from the host
pub trait StatuslineHost {
    /// Opaque value of the host's native status bar option
    type DisplayMode: Clone + fmt::Debug;

    /// Current native status bar setting
    fn display_mode(&self) -> Self::DisplayMode;

    /// Change the native status bar setting
    fn set_display_mode(&mut self, mode: Self::DisplayMode);

    /// Setting that hides the host's own status bar
    fn suppressed_mode(&self) -> Self::DisplayMode;

    /// Start delivering change notifications to the controller
    fn subscribe(&mut self) -> SubscriptionId;

    /// Stop delivering change notifications for `subscription`
    fn unsubscribe(&mut self, subscription: SubscriptionId);

    /// Evaluate the statusline, optionally with a template override
    ///
    /// # Errors
    ///
    /// Evaluation errors make the controller clear the mirrored statusline.
    fn evaluate(&mut self, template: Option<&str>) -> Result<RenderedLine, HostError>;
}
