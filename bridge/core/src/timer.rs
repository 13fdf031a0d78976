//! Deferred Callbacks
//!
//! The debounce window is the only point where the bridge waits, and it never
//! blocks: scheduling returns a [`TimerHandle`] at once, and when the delay
//! has passed the host loop hands that handle back to
//! [`StatuslineController::on_timer`](crate::lifecycle::StatuslineController::on_timer).
//! Cancelling a handle guarantees it is never delivered by this timer.
//!
//! Two implementations:
//! - [`ManualTimer`]: a virtual clock advanced explicitly, for hosts with
//!   their own event loop and for deterministic tests
//! - [`TokioTimer`]: one `tokio::time::sleep` task per deadline, fired handles
//!   arrive on a [`FiredTimers`] channel

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one scheduled deadline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Raw numeric id
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Source of cancellable deadlines
pub trait Timer {
    /// Arrange for `handle` to fire once after `delay`
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Drop a scheduled deadline; unknown or already fired handles are ignored
    fn cancel(&mut self, handle: TimerHandle);
}

// =============================================================================
// Manual Timer
// =============================================================================

/// Virtual clock timer
///
/// Time only moves when [`ManualTimer::advance`] is called.
#[derive(Debug, Default)]
pub struct ManualTimer {
    now: Duration,
    next_id: u64,
    pending: Vec<(Duration, TimerHandle)>,
}

impl ManualTimer {
    /// Create a timer at virtual time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of deadlines not yet fired or cancelled
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock forward and return every handle now due, earliest first
    pub fn advance(&mut self, by: Duration) -> Vec<TimerHandle> {
        self.now += by;
        let now = self.now;

        let mut due: Vec<(Duration, TimerHandle)> = Vec::new();
        self.pending.retain(|entry| {
            if entry.0 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort();
        due.into_iter().map(|(_, handle)| handle).collect()
    }
}

impl Timer for ManualTimer {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push((self.now + delay, handle));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|(_, pending)| *pending != handle);
    }
}

// =============================================================================
// Tokio Timer
// =============================================================================

/// Receiving end for handles fired by a [`TokioTimer`]
#[derive(Debug)]
pub struct FiredTimers {
    rx: mpsc::UnboundedReceiver<TimerHandle>,
}

impl FiredTimers {
    /// Wait for the next fired handle
    ///
    /// Returns `None` once the timer has been dropped and nothing is queued.
    pub async fn recv(&mut self) -> Option<TimerHandle> {
        self.rx.recv().await
    }

    /// Next fired handle if one is already queued
    pub fn try_recv(&mut self) -> Option<TimerHandle> {
        self.rx.try_recv().ok()
    }
}

/// Timer backed by tokio sleep tasks
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioTimer {
    next_id: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
    fired_tx: mpsc::UnboundedSender<TimerHandle>,
}

impl TokioTimer {
    /// Create a timer and the channel its fired handles arrive on
    #[must_use]
    pub fn new() -> (Self, FiredTimers) {
        let (fired_tx, rx) = mpsc::unbounded_channel();
        let timer = Self {
            next_id: 0,
            tasks: HashMap::new(),
            fired_tx,
        };
        (timer, FiredTimers { rx })
    }

    /// Number of sleep tasks still running
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl Timer for TokioTimer {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let tx = self.fired_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the host loop has shut down
            let _ = tx.send(handle);
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_manual_timer_fires_when_due() {
        let mut timer = ManualTimer::new();
        let handle = timer.schedule(MS * 100);

        assert!(timer.advance(MS * 99).is_empty());
        assert_eq!(timer.advance(MS), vec![handle]);
        assert_eq!(timer.pending_count(), 0);
        assert_eq!(timer.now(), MS * 100);
    }

    #[test]
    fn test_manual_timer_orders_by_deadline() {
        let mut timer = ManualTimer::new();
        let late = timer.schedule(MS * 50);
        let early = timer.schedule(MS * 10);

        assert_eq!(timer.advance(MS * 60), vec![early, late]);
    }

    #[test]
    fn test_manual_timer_cancel() {
        let mut timer = ManualTimer::new();
        let handle = timer.schedule(MS * 10);
        timer.cancel(handle);
        // Cancelling twice is harmless
        timer.cancel(handle);

        assert!(timer.advance(MS * 100).is_empty());
    }

    #[test]
    fn test_handles_are_unique() {
        let mut timer = ManualTimer::new();
        let a = timer.schedule(MS);
        let b = timer.schedule(MS);
        assert_ne!(a, b);
        assert_eq!(a.to_string(), format!("timer#{}", a.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_timer_fires_after_delay() {
        let (mut timer, mut fired) = TokioTimer::new();
        let handle = timer.schedule(MS * 100);

        tokio::time::advance(MS * 50).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.try_recv(), None);

        assert_eq!(fired.recv().await, Some(handle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_timer_cancel_prevents_delivery() {
        let (mut timer, mut fired) = TokioTimer::new();
        let cancelled = timer.schedule(MS * 10);
        let kept = timer.schedule(MS * 20);
        timer.cancel(cancelled);

        assert_eq!(fired.recv().await, Some(kept));
        tokio::time::advance(MS * 100).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.try_recv(), None);
        assert_eq!(timer.active_count(), 0);
    }
}
