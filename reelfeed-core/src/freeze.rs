//! Remount avoidance across orientation changes.
//!
//! Swapping window variants changes which indices the live range reports.
//! Rendering that immediately would unmount and remount every item and throw
//! away playback state, so the previously rendered set is held for a short
//! window while the new variant settles.

use std::time::{Duration, Instant};

use crate::timer::Deadline;

/// Default freeze duration.
pub const FREEZE_DURATION: Duration = Duration::from_millis(100);

/// Holds a frozen render set for a bounded time.
#[derive(Debug, Clone)]
pub struct FreezeGuard {
    duration: Duration,
    frozen: Option<Vec<usize>>,
    release: Deadline,
}

impl Default for FreezeGuard {
    fn default() -> Self {
        Self::new(FREEZE_DURATION)
    }
}

impl FreezeGuard {
    /// Creates an idle guard.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            frozen: None,
            release: Deadline::default(),
        }
    }

    /// Freezes `rendered` until `now + duration`.
    ///
    /// Engaging again while frozen replaces the snapshot and re-arms the same
    /// release timer, so exactly one release follows a burst of transitions.
    pub fn engage(&mut self, rendered: &[usize], now: Instant) {
        tracing::debug!(rendered = ?rendered, "freezing rendered items for orientation change");
        self.frozen = Some(rendered.to_vec());
        self.release.arm(now + self.duration);
    }

    /// Releases the freeze if due. Returns `true` on release.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.release.fire(now) {
            return false;
        }
        self.frozen = None;
        tracing::debug!("released frozen render set");
        true
    }

    /// Whether a frozen set is overriding the live range.
    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    /// The frozen set while frozen, otherwise `live`.
    pub fn resolve<'a>(&'a self, live: &'a [usize]) -> &'a [usize] {
        self.frozen.as_deref().unwrap_or(live)
    }

    /// Release deadline, if frozen.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.release.deadline()
    }

    /// Drops the freeze immediately.
    pub fn cancel(&mut self) {
        self.frozen = None;
        self.release.cancel();
    }
}
