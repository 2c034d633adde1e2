//! Owned, cancellable timers.
//!
//! The engine never sleeps and never spawns: every timer is a deadline stored
//! in the component that owns it. The event loop passes the current `Instant`
//! into `tick()` and each component fires whatever is due. Cancelling a timer
//! is just clearing its deadline, so a superseded timer can never fire later.

use std::time::{Duration, Instant};

/// A single-shot timer that fires once `now` reaches its deadline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Arms (or re-arms) the timer to fire at `at`, replacing any earlier deadline.
    pub fn arm(&mut self, at: Instant) {
        self.at = Some(at);
    }

    /// Arms the timer to fire `delay` after `now`.
    pub fn arm_after(&mut self, now: Instant, delay: Duration) {
        self.arm(now + delay);
    }

    /// Disarms the timer. Returns `true` if it was armed.
    pub fn cancel(&mut self) -> bool {
        self.at.take().is_some()
    }

    /// Returns `true` while a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    /// The pending deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.at
    }

    /// Fires the timer if it is due, disarming it. Returns `true` on fire.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }
}

/// Returns the earlier of two optional deadlines.
pub fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// State of a [`Throttle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState<T> {
    /// Nothing scheduled.
    Idle,
    /// A value will be emitted at `deadline`.
    Pending {
        /// The most recent value passed to [`Throttle::call`].
        value: T,
        /// When the value is emitted.
        deadline: Instant,
    },
}

/// Trailing-edge throttle.
///
/// The first call in a quiet period opens a window; further calls inside the
/// window only replace the pending value. When the window closes the latest
/// value is emitted exactly once. There is no leading-edge emission and the
/// deadline is never pushed back by later calls.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    window: Duration,
    state: ThrottleState<T>,
}

impl<T> Throttle<T> {
    /// Creates an idle throttle with the given window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: ThrottleState::Idle,
        }
    }

    /// The throttle window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Current state.
    pub fn state(&self) -> &ThrottleState<T> {
        &self.state
    }

    /// Schedules `value`, replacing any value already pending in this window.
    pub fn call(&mut self, value: T, now: Instant) {
        match &mut self.state {
            ThrottleState::Idle => {
                self.state = ThrottleState::Pending {
                    value,
                    deadline: now + self.window,
                };
            }
            ThrottleState::Pending { value: pending, .. } => *pending = value,
        }
    }

    /// Emits the pending value if its window has closed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.state {
            ThrottleState::Pending { deadline, .. } if now >= deadline => {
                match std::mem::replace(&mut self.state, ThrottleState::Idle) {
                    ThrottleState::Pending { value, .. } => Some(value),
                    ThrottleState::Idle => None,
                }
            }
            _ => None,
        }
    }

    /// Drops any pending value without emitting it.
    pub fn cancel(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, ThrottleState::Idle) {
            ThrottleState::Pending { value, .. } => Some(value),
            ThrottleState::Idle => None,
        }
    }

    /// Deadline of the pending emission, if any.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            ThrottleState::Pending { deadline, .. } => Some(deadline),
            ThrottleState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn deadline_fires_once() {
        let t0 = Instant::now();
        let mut d = Deadline::default();
        d.arm_after(t0, 100 * MS);
        assert!(!d.fire(t0 + 99 * MS));
        assert!(d.fire(t0 + 100 * MS));
        assert!(!d.fire(t0 + 200 * MS));
    }

    #[test]
    fn cancelled_deadline_never_fires() {
        let t0 = Instant::now();
        let mut d = Deadline::default();
        d.arm_after(t0, 10 * MS);
        assert!(d.cancel());
        assert!(!d.fire(t0 + 50 * MS));
    }

    #[test]
    fn throttle_emits_latest_on_trailing_edge() {
        let t0 = Instant::now();
        let mut th = Throttle::new(100 * MS);
        th.call(1, t0);
        th.call(2, t0 + 30 * MS);
        th.call(3, t0 + 60 * MS);
        assert_eq!(th.poll(t0 + 60 * MS), None);
        assert_eq!(th.deadline(), Some(t0 + 100 * MS));
        assert_eq!(th.poll(t0 + 100 * MS), Some(3));
        assert_eq!(th.poll(t0 + 300 * MS), None);
    }

    #[test]
    fn earliest_picks_the_sooner_deadline() {
        let t0 = Instant::now();
        assert_eq!(earliest(Some(t0 + MS), Some(t0)), Some(t0));
        assert_eq!(earliest(None, Some(t0)), Some(t0));
        assert_eq!(earliest(None, None), None);
    }
}
