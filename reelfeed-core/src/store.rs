//! The authoritative current index.
//!
//! `working` is written synchronously and read by navigation that needs
//! immediate feedback (keyboard repeat, relative jumps). `published` trails it
//! through a trailing-edge throttle and is the only value prefetch and playback
//! ever see.

use std::time::{Duration, Instant};

use crate::index::{clamp_index, Target};
use crate::timer::Throttle;

/// Default publish window.
pub const PUBLISH_THROTTLE: Duration = Duration::from_millis(100);

/// Working and published current index.
#[derive(Debug, Clone)]
pub struct IndexStore {
    working: usize,
    published: usize,
    item_count: usize,
    throttle: Throttle<usize>,
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new(PUBLISH_THROTTLE)
    }
}

impl IndexStore {
    /// Creates a store at index 0 with the given publish window.
    pub fn new(window: Duration) -> Self {
        Self {
            working: 0,
            published: 0,
            item_count: 0,
            throttle: Throttle::new(window),
        }
    }

    /// Low-latency index used by navigation.
    pub fn working(&self) -> usize {
        self.working
    }

    /// Rate-limited index seen by downstream consumers.
    pub fn published(&self) -> usize {
        self.published
    }

    /// Number of items indices are clamped against.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Raises the item count. Shrinking is ignored; the feed only grows.
    pub fn set_item_count(&mut self, item_count: usize) -> bool {
        if item_count <= self.item_count {
            return false;
        }
        self.item_count = item_count;
        true
    }

    /// Writes `working` now and schedules a throttled publish of it.
    ///
    /// Relative targets resolve against the previous working value, never the
    /// published one. Returns the new working index.
    pub fn set_index_immediate(&mut self, target: Target, now: Instant) -> usize {
        let next = target.resolve(self.working, self.item_count);
        self.working = next;
        self.throttle.call(next, now);
        next
    }

    /// Publishes the pending value if the window has closed.
    ///
    /// Returns the newly published index, or `None` if nothing was due or the
    /// value did not change.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        let value = clamp_index(self.throttle.poll(now)? as i64, self.item_count);
        if value == self.published {
            return None;
        }
        self.published = value;
        tracing::debug!(index = value, "published current index");
        Some(value)
    }

    /// Deadline of the pending publish.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    /// Drops a pending publish.
    pub fn cancel(&mut self) {
        self.throttle.cancel();
    }
}
