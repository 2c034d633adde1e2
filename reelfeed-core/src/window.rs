//! Virtualization windows.
//!
//! A window decides which item indices must be mounted for a given scroll
//! offset. The computation is a pure function of its inputs, so the two
//! variants below can be swapped at any time; the only discontinuity on a swap
//! is the deliberate freeze applied by [`crate::freeze::FreezeGuard`].
//!
//! - [`DocumentWindow`]: portrait feeds. The whole feed pane scrolls vertically
//!   and one item is exactly one pane tall.
//! - [`ContainerWindow`]: forced-landscape feeds. The feed container scrolls
//!   horizontally and one item is exactly one pane wide.

/// Layout orientation of the feed. Selects the active window variant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OrientationMode {
    /// Items stack vertically; driven by [`DocumentWindow`].
    #[default]
    Portrait,
    /// Items stack horizontally; driven by [`ContainerWindow`].
    ForcedLandscape,
}

impl OrientationMode {
    /// Maps the `force_landscape` setting onto an orientation.
    pub fn from_force_landscape(force_landscape: &bool) -> Self {
        if *force_landscape {
            OrientationMode::ForcedLandscape
        } else {
            OrientationMode::Portrait
        }
    }

    /// The scroll axis items are laid out along.
    pub fn axis(self) -> Axis {
        match self {
            OrientationMode::Portrait => Axis::Vertical,
            OrientationMode::ForcedLandscape => Axis::Horizontal,
        }
    }

    /// Short label for status lines.
    pub fn label(self) -> &'static str {
        match self {
            OrientationMode::Portrait => "portrait",
            OrientationMode::ForcedLandscape => "landscape",
        }
    }
}

/// Scroll axis of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Rows.
    Vertical,
    /// Columns.
    Horizontal,
}

/// Size of the feed pane in terminal cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PaneSize {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

impl PaneSize {
    /// Creates a pane size.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Length of the pane along `axis`.
    pub fn along(self, axis: Axis) -> u32 {
        match axis {
            Axis::Vertical => u32::from(self.height),
            Axis::Horizontal => u32::from(self.width),
        }
    }
}

/// Indices that must be mounted, plus the extents they were computed with.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VirtualRange {
    /// Mounted indices, ascending and contiguous.
    pub indices: Vec<usize>,
    /// Extent of one item along the scroll axis (0 when not yet measured).
    pub item_extent: u32,
    /// Total scrollable extent: `item_count * item_extent`.
    pub total_extent: u64,
}

impl VirtualRange {
    /// Returns `true` if `index` is mounted.
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Returns `true` if nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Computes the mounted range for a feed of fixed-extent items.
///
/// Visible items are those overlapping `[scroll_offset, scroll_offset +
/// viewport_extent)`; `overscan` extra items are added on both sides. A zero
/// `item_count` or an unmeasured (`0`) `item_extent` yields an empty range with
/// zero total extent.
pub fn compute(
    item_count: usize,
    item_extent: u32,
    scroll_offset: u64,
    viewport_extent: u32,
    overscan: usize,
) -> VirtualRange {
    if item_count == 0 || item_extent == 0 {
        return VirtualRange::default();
    }

    let extent = u64::from(item_extent);
    let total_extent = extent.saturating_mul(item_count as u64);
    let last = item_count - 1;

    let offset = scroll_offset.min(total_extent.saturating_sub(1));
    let viewport_end = offset + u64::from(viewport_extent.max(1));

    let first_visible = ((offset / extent) as usize).min(last);
    let last_visible = (((viewport_end - 1) / extent) as usize).min(last);

    let start = first_visible.saturating_sub(overscan);
    let end = last_visible.saturating_add(overscan).min(last);

    VirtualRange {
        indices: (start..=end).collect(),
        item_extent,
        total_extent,
    }
}

/// A virtualization window variant.
pub trait VirtualWindow {
    /// The orientation this variant serves.
    fn orientation(&self) -> OrientationMode;

    /// Scroll axis of the variant's surface.
    fn axis(&self) -> Axis {
        self.orientation().axis()
    }

    /// Measures one item's extent from the feed pane.
    ///
    /// Items fill the pane along the scroll axis, so the pane itself is the
    /// representative element. `None` while the pane has no size yet.
    fn measure(&self, pane: PaneSize) -> Option<u32> {
        let extent = pane.along(self.axis());
        (extent > 0).then_some(extent)
    }

    /// Computes the mounted range. See [`compute`].
    fn compute(
        &self,
        item_count: usize,
        item_extent: u32,
        scroll_offset: u64,
        viewport_extent: u32,
        overscan: usize,
    ) -> VirtualRange {
        compute(item_count, item_extent, scroll_offset, viewport_extent, overscan)
    }
}

/// Portrait variant: the document scrolls vertically.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentWindow;

impl VirtualWindow for DocumentWindow {
    fn orientation(&self) -> OrientationMode {
        OrientationMode::Portrait
    }
}

/// Forced-landscape variant: the feed container scrolls horizontally.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerWindow;

impl VirtualWindow for ContainerWindow {
    fn orientation(&self) -> OrientationMode {
        OrientationMode::ForcedLandscape
    }
}

/// Returns the window variant for `orientation`.
pub fn window_for(orientation: OrientationMode) -> &'static dyn VirtualWindow {
    match orientation {
        OrientationMode::Portrait => &DocumentWindow,
        OrientationMode::ForcedLandscape => &ContainerWindow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_feed_has_no_extent() {
        let range = compute(0, 40, 0, 40, 1);
        assert!(range.is_empty());
        assert_eq!(range.total_extent, 0);
    }

    #[test]
    fn unmeasured_extent_yields_empty_range() {
        let range = compute(10, 0, 0, 40, 1);
        assert!(range.is_empty());
        assert_eq!(range.total_extent, 0);
    }

    #[test]
    fn aligned_offset_mounts_current_plus_overscan() {
        let range = compute(20, 40, 5 * 40, 40, 1);
        assert_eq!(range.indices, vec![4, 5, 6]);
        assert_eq!(range.total_extent, 800);
    }

    #[test]
    fn straddling_offset_mounts_both_visible_items() {
        let range = compute(20, 40, 5 * 40 + 10, 40, 1);
        assert_eq!(range.indices, vec![4, 5, 6, 7]);
    }

    #[test]
    fn range_never_leaves_the_feed() {
        assert_eq!(compute(3, 40, 0, 40, 2).indices, vec![0, 1, 2]);
        assert_eq!(compute(3, 40, 10_000, 40, 1).indices, vec![1, 2]);
    }

    #[test]
    fn variants_measure_along_their_axis() {
        let pane = PaneSize::new(120, 30);
        assert_eq!(DocumentWindow.measure(pane), Some(30));
        assert_eq!(ContainerWindow.measure(pane), Some(120));
        assert_eq!(DocumentWindow.measure(PaneSize::new(120, 0)), None);
        assert_eq!(
            window_for(OrientationMode::ForcedLandscape).orientation(),
            OrientationMode::ForcedLandscape
        );
    }
}
