//! Command-line hosts
//!
//! A shell has no editor windows of its own, so [`ShellGraph`] is a single
//! window with no neighbours and every navigation request is forwarded.
//! [`StdinHost`] stands in for an editor that evaluates its statusline
//! elsewhere and streams the result as JSON lines.

use muxbridge_core::{
    Direction, HostError, RenderedLine, StatuslineHost, SubscriptionId, WindowGraph, WindowId,
};
use tracing::debug;

/// Window graph of a plain shell: one window, nothing around it
#[derive(Debug, Default)]
pub struct ShellGraph;

impl WindowGraph for ShellGraph {
    fn current(&self) -> Result<WindowId, HostError> {
        Ok(WindowId(0))
    }

    fn neighbor(&self, _direction: Direction) -> Result<WindowId, HostError> {
        Ok(WindowId(0))
    }

    fn focus(&mut self, window: WindowId) -> Result<(), HostError> {
        Err(HostError::Unavailable(format!(
            "shell has no window {window} to focus"
        )))
    }
}

/// Statusline host fed by an external producer
///
/// The producer's native status bar is out of reach; the display mode is
/// tracked so the controller can save and restore it, nothing more.
#[derive(Debug)]
pub struct StdinHost {
    latest: Option<Result<RenderedLine, HostError>>,
    native_visible: bool,
    next_subscription: u64,
    active_subscription: Option<SubscriptionId>,
    lines_received: u64,
}

impl Default for StdinHost {
    fn default() -> Self {
        Self::new()
    }
}

impl StdinHost {
    pub fn new() -> Self {
        Self {
            latest: None,
            native_visible: true,
            next_subscription: 0,
            active_subscription: None,
            lines_received: 0,
        }
    }

    /// Take one line of producer output as the current statusline
    ///
    /// A line that is not a valid `RenderedLine` document replaces the
    /// current statusline with an evaluation error.
    pub fn receive(&mut self, line: &str) {
        self.lines_received += 1;
        self.latest = Some(RenderedLine::from_json(line).map_err(|e| {
            debug!(line = self.lines_received, error = %e, "Malformed statusline document");
            HostError::Malformed(e.to_string())
        }));
    }

    pub fn lines_received(&self) -> u64 {
        self.lines_received
    }

    #[cfg(test)]
    pub fn is_subscribed(&self) -> bool {
        self.active_subscription.is_some()
    }
}

impl StatuslineHost for StdinHost {
    type DisplayMode = bool;

    fn display_mode(&self) -> bool {
        self.native_visible
    }

    fn set_display_mode(&mut self, visible: bool) {
        debug!(visible, "Native statusline visibility changed");
        self.native_visible = visible;
    }

    fn suppressed_mode(&self) -> bool {
        false
    }

    fn subscribe(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.active_subscription = Some(id);
        id
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        if self.active_subscription == Some(subscription) {
            self.active_subscription = None;
        }
    }

    /// Latest producer line; templates are evaluated by the producer, so the
    /// override is ignored here
    fn evaluate(&mut self, _template: Option<&str>) -> Result<RenderedLine, HostError> {
        match &self.latest {
            Some(result) => result.clone(),
            None => Err(HostError::Unavailable(
                "no statusline received yet".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shell_graph_has_no_neighbours() {
        let graph = ShellGraph;
        for direction in Direction::ALL {
            assert_eq!(graph.neighbor(direction), graph.current());
        }
    }

    #[test]
    fn test_stdin_host_evaluates_latest_line() {
        let mut host = StdinHost::new();
        assert!(matches!(
            host.evaluate(None),
            Err(HostError::Unavailable(_))
        ));

        host.receive(r#"{"text": "one"}"#);
        host.receive(r#"{"text": "two", "spans": [{"start": 0, "bold": true}]}"#);

        let line = host.evaluate(Some("ignored")).unwrap();
        assert_eq!(line.text, "two");
        assert!(line.spans[0].bold);
        assert_eq!(host.lines_received(), 2);
    }

    #[test]
    fn test_malformed_line_is_an_evaluation_failure() {
        let mut host = StdinHost::new();
        host.receive(r#"{"text": "ok"}"#);
        host.receive("not json");

        assert!(matches!(host.evaluate(None), Err(HostError::Malformed(_))));
    }

    #[test]
    fn test_subscription_tracking() {
        let mut host = StdinHost::new();
        let first = host.subscribe();
        assert!(host.is_subscribed());

        host.unsubscribe(SubscriptionId(first.0 + 1));
        assert!(host.is_subscribed());

        host.unsubscribe(first);
        assert!(!host.is_subscribed());
    }
}
