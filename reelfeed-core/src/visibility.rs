//! Visibility detection: which mounted item is actually on screen.

use std::collections::BTreeSet;

use crate::observer::{IntersectionEntry, IntersectionObserver, Viewport};

/// Minimum winning ratio, exclusive, for a visibility report.
pub const MIN_VISIBLE_RATIO: f32 = 0.3;

/// Infers the current index from intersection entries of mounted items.
#[derive(Debug, Clone)]
pub struct VisibilityDetector {
    min_ratio: f32,
    tracked: BTreeSet<usize>,
    observer: IntersectionObserver,
}

impl Default for VisibilityDetector {
    fn default() -> Self {
        Self::new(MIN_VISIBLE_RATIO)
    }
}

impl VisibilityDetector {
    /// Creates a detector that only reports ratios strictly above `min_ratio`.
    pub fn new(min_ratio: f32) -> Self {
        Self {
            min_ratio,
            tracked: BTreeSet::new(),
            observer: IntersectionObserver::default(),
        }
    }

    /// Indices currently observed.
    pub fn tracked(&self) -> impl Iterator<Item = usize> + '_ {
        self.tracked.iter().copied()
    }

    /// Re-subscribes to `mounted` if it differs from the tracked set.
    ///
    /// All previous observations are dropped first, so every mounted item
    /// reports a fresh entry on the next [`collect`](Self::collect). Returns
    /// `true` when the set changed.
    pub fn resync(&mut self, mounted: &[usize]) -> bool {
        if mounted.len() == self.tracked.len() && mounted.iter().all(|i| self.tracked.contains(i)) {
            return false;
        }
        self.observer.disconnect();
        self.tracked = mounted.iter().copied().collect();
        for &index in &self.tracked {
            self.observer.observe(index);
        }
        tracing::trace!(tracked = ?self.tracked, "visibility detector re-observed mounted items");
        true
    }

    /// Pending intersection entries for the observed items.
    pub fn collect(&mut self, viewport: Viewport) -> Vec<IntersectionEntry> {
        self.observer.take_records(viewport)
    }

    /// Picks the index to report for one batch of entries, if any.
    ///
    /// The entry with the strictly greatest ratio wins (earlier entries win
    /// ties). It is reported only if its ratio exceeds the minimum and it is
    /// not already the `working` index. Entries for untracked indices are
    /// ignored.
    pub fn select(&self, entries: &[IntersectionEntry], working: usize) -> Option<usize> {
        let mut best_ratio = 0.0_f32;
        let mut best = working;
        for entry in entries {
            if !self.tracked.contains(&entry.index) {
                continue;
            }
            if entry.ratio > best_ratio {
                best_ratio = entry.ratio;
                best = entry.index;
            }
        }
        if best == working || best_ratio <= self.min_ratio {
            return None;
        }
        Some(best)
    }

    /// Stops observing everything.
    pub fn disconnect(&mut self) {
        self.observer.disconnect();
        self.tracked.clear();
    }
}
