//! Intersection observation for mounted feed items.
//!
//! Derives each observed item's on-screen intersection ratio from the active
//! surface's geometry and reports an entry whenever the ratio crosses one of
//! [`THRESHOLDS`], plus once when an item is first observed.

use std::collections::BTreeMap;

/// Ratios at which a change is reported.
pub const THRESHOLDS: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Visibility of one observed item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Index of the observed item.
    pub index: usize,
    /// Fraction of the item inside the viewport, in `[0, 1]`.
    pub ratio: f32,
}

/// Geometry needed to compute intersections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Scroll offset of the surface.
    pub offset: u64,
    /// Visible length of the surface.
    pub extent: u32,
    /// Length of one item.
    pub item_extent: u32,
}

/// Fraction of item `index` visible in `viewport`.
pub fn intersection_ratio(index: usize, viewport: Viewport) -> f32 {
    if viewport.item_extent == 0 {
        return 0.0;
    }
    let item = u64::from(viewport.item_extent);
    let start = (index as u64).saturating_mul(item);
    let end = start.saturating_add(item);
    let visible_start = start.max(viewport.offset);
    let visible_end = end.min(viewport.offset.saturating_add(u64::from(viewport.extent)));
    let overlap = visible_end.saturating_sub(visible_start);
    (overlap as f64 / item as f64) as f32
}

fn threshold_bucket(ratio: f32) -> usize {
    if ratio <= 0.0 {
        return 0;
    }
    THRESHOLDS.iter().filter(|t| ratio >= **t).count()
}

/// Tracks observed item indices and the last threshold each one reported.
#[derive(Debug, Default, Clone)]
pub struct IntersectionObserver {
    observed: BTreeMap<usize, Option<usize>>,
}

impl IntersectionObserver {
    /// Starts observing `index`. Its first record is always reported.
    pub fn observe(&mut self, index: usize) {
        self.observed.entry(index).or_insert(None);
    }

    /// Stops observing everything.
    pub fn disconnect(&mut self) {
        self.observed.clear();
    }

    /// Observed indices, ascending.
    pub fn observed(&self) -> impl Iterator<Item = usize> + '_ {
        self.observed.keys().copied()
    }

    /// Entries for every observed item whose threshold bucket changed.
    pub fn take_records(&mut self, viewport: Viewport) -> Vec<IntersectionEntry> {
        if viewport.item_extent == 0 {
            return Vec::new();
        }
        let mut entries = Vec::new();
        for (&index, last) in &mut self.observed {
            let ratio = intersection_ratio(index, viewport);
            let bucket = threshold_bucket(ratio);
            if *last != Some(bucket) {
                *last = Some(bucket);
                entries.push(IntersectionEntry { index, ratio });
            }
        }
        entries
    }
}
