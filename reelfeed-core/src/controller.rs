//! The feed controller: composition root of the synchronization engine.
//!
//! Owns the index store, scroll controller, freeze guard, visibility detector
//! and one scroll surface per window variant, and routes every input through
//! them:
//!
//! - next / previous: scroll to the neighbouring item instantly *and* write
//!   the working index, without waiting for the scroll to report back.
//! - scroll events: extend the snap suspension, mark the feed as actively
//!   scrolling, recompute the mounted range and let the visibility detector
//!   correct the working index.
//! - publishes: ask the data source for more items near the loaded tail.
//! - resize: re-measure and re-anchor if the item extent changed.
//! - orientation change: freeze the rendered set, swap window variants and
//!   re-anchor on the new surface.
//!
//! Time is injected. The owner calls [`FeedController::tick`] on every event
//! and no later than [`FeedController::next_deadline`].

use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::freeze::FreezeGuard;
use crate::index::Target;
use crate::observer::Viewport;
use crate::scroll::{ScrollCommand, ScrollController};
use crate::store::IndexStore;
use crate::surface::{ScrollBehavior, ScrollEvent, ScrollSurface, SurfaceTimings};
use crate::timer::{earliest, Deadline};
use crate::visibility::VisibilityDetector;
use crate::window::{window_for, Axis, OrientationMode, PaneSize, VirtualRange};

/// Engine tunables. Every field has a default; all may be set from config.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Items mounted beyond the visible ones on each side.
    pub overscan: usize,
    /// Publish window of the current index.
    pub publish_throttle_ms: u64,
    /// Quiet period after the last scroll event before snapping resumes.
    pub snap_reenable_ms: u64,
    /// How long the render set stays frozen after an orientation change.
    pub freeze_ms: u64,
    /// Quiet period after which the feed stops counting as scrolling.
    pub scrolling_reset_ms: u64,
    /// Length of smooth-scroll animations.
    pub smooth_scroll_ms: u64,
    /// Quiet period after user scrolling before the surface snaps.
    pub snap_settle_ms: u64,
    /// Load more once the published index is this close to the tail.
    pub prefetch_margin: usize,
    /// Visibility ratio an item must exceed to become current.
    pub min_visible_ratio: f32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            overscan: 1,
            publish_throttle_ms: 100,
            snap_reenable_ms: 100,
            freeze_ms: 100,
            scrolling_reset_ms: 150,
            smooth_scroll_ms: 200,
            snap_settle_ms: 150,
            prefetch_margin: 5,
            min_visible_ratio: crate::visibility::MIN_VISIBLE_RATIO,
        }
    }
}

impl FeedConfig {
    fn surface_timings(&self) -> SurfaceTimings {
        SurfaceTimings {
            smooth_scroll: Duration::from_millis(self.smooth_scroll_ms),
            snap_settle: Duration::from_millis(self.snap_settle_ms),
        }
    }
}

/// Something the owner of the controller has to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEffect {
    /// The published index changed.
    Published(usize),
    /// The published index is near the loaded tail; fetch more items.
    LoadMore {
        /// Item count at the time of the request.
        item_count: usize,
    },
}

/// Signals handed to the item renderer for one mounted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemProps {
    /// Position in the feed.
    pub index: usize,
    /// Whether this is the published current item.
    pub is_current: bool,
    /// Whether the feed is scrolling right now.
    pub is_actively_scrolling: bool,
}

/// Coarse controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// No programmatic scroll in flight.
    Idle,
    /// A programmatic scroll is running or only just finished.
    ProgrammaticScroll,
}

#[derive(Debug, Clone)]
struct Surfaces {
    document: ScrollSurface,
    container: ScrollSurface,
}

impl Surfaces {
    fn new(timings: SurfaceTimings) -> Self {
        Self {
            document: ScrollSurface::new(Axis::Vertical, timings),
            container: ScrollSurface::new(Axis::Horizontal, timings),
        }
    }

    fn get(&self, orientation: OrientationMode) -> &ScrollSurface {
        match orientation {
            OrientationMode::Portrait => &self.document,
            OrientationMode::ForcedLandscape => &self.container,
        }
    }

    fn split_mut(&mut self, orientation: OrientationMode) -> (&mut ScrollSurface, &mut ScrollSurface) {
        match orientation {
            OrientationMode::Portrait => (&mut self.document, &mut self.container),
            OrientationMode::ForcedLandscape => (&mut self.container, &mut self.document),
        }
    }

    fn each_mut(&mut self) -> [&mut ScrollSurface; 2] {
        [&mut self.document, &mut self.container]
    }
}

/// Keeps scroll position, mounted items and the current index in agreement.
#[derive(Debug, Clone)]
pub struct FeedController {
    config: FeedConfig,
    orientation: OrientationMode,
    pane: PaneSize,
    item_extent: u32,
    surfaces: Option<Surfaces>,
    store: IndexStore,
    scroll: ScrollController,
    freeze: FreezeGuard,
    detector: VisibilityDetector,
    activity: Deadline,
    actively_scrolling: bool,
    live: VirtualRange,
    rendered: Vec<usize>,
    effects: Vec<FeedEffect>,
}

impl FeedController {
    /// Creates a detached controller at index 0.
    pub fn new(config: FeedConfig, orientation: OrientationMode) -> Self {
        Self {
            config,
            orientation,
            pane: PaneSize::default(),
            item_extent: 0,
            surfaces: None,
            store: IndexStore::new(Duration::from_millis(config.publish_throttle_ms)),
            scroll: ScrollController::new(Duration::from_millis(config.snap_reenable_ms)),
            freeze: FreezeGuard::new(Duration::from_millis(config.freeze_ms)),
            detector: VisibilityDetector::new(config.min_visible_ratio),
            activity: Deadline::default(),
            actively_scrolling: false,
            live: VirtualRange::default(),
            rendered: Vec::new(),
            effects: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Mounts the feed into a pane of `pane` cells.
    ///
    /// Creates the scroll surfaces, measures the item extent and anchors the
    /// active surface on the working index. Attaching an attached controller
    /// behaves like [`resize`](Self::resize).
    pub fn attach(&mut self, pane: PaneSize, now: Instant) {
        if self.surfaces.is_some() {
            self.resize(pane, now);
            return;
        }
        self.surfaces = Some(Surfaces::new(self.config.surface_timings()));
        self.pane = pane;
        self.item_extent = self.measure();
        tracing::info!(
            width = pane.width,
            height = pane.height,
            item_extent = self.item_extent,
            orientation = self.orientation.label(),
            "feed attached"
        );
        self.layout_surfaces(now);
        self.issue_scroll(Target::CURRENT, ScrollBehavior::Instant, now);
        self.settle(now);
        self.check_prefetch();
    }

    /// Unmounts the feed: drops the surfaces and cancels every timer.
    pub fn detach(&mut self) {
        if let Some(mut surfaces) = self.surfaces.take() {
            for surface in surfaces.each_mut() {
                surface.cancel();
            }
        }
        self.store.cancel();
        self.scroll.cancel();
        self.freeze.cancel();
        self.activity.cancel();
        self.actively_scrolling = false;
        self.detector.disconnect();
        self.live = VirtualRange::default();
        self.rendered.clear();
        tracing::info!("feed detached");
    }

    /// Whether a pane is attached.
    pub fn is_attached(&self) -> bool {
        self.surfaces.is_some()
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Raises the item count as more media arrives. Shrinking is ignored.
    pub fn set_item_count(&mut self, item_count: usize, now: Instant) {
        if !self.store.set_item_count(item_count) {
            return;
        }
        tracing::debug!(item_count, "item count grew");
        self.layout_surfaces(now);
        self.settle(now);
        self.check_prefetch();
    }

    /// The pane was resized.
    ///
    /// Re-measures the item extent; if it changed, the offset in cells no
    /// longer points at the working item, so the active surface is re-anchored.
    pub fn resize(&mut self, pane: PaneSize, now: Instant) {
        self.pane = pane;
        if self.surfaces.is_none() {
            return;
        }
        let previous = self.item_extent;
        self.item_extent = self.measure();
        self.layout_surfaces(now);
        if self.item_extent != previous {
            tracing::debug!(previous, item_extent = self.item_extent, "item extent changed, restoring position");
            self.issue_scroll(Target::CURRENT, ScrollBehavior::Instant, now);
        }
        self.settle(now);
    }

    /// Switches window variants.
    ///
    /// The rendered set is frozen first, then the variant swaps and the new
    /// surface is anchored on the working index. Returns `false` if the
    /// orientation did not change.
    pub fn set_orientation(&mut self, orientation: OrientationMode, now: Instant) -> bool {
        if orientation == self.orientation {
            return false;
        }
        tracing::info!(from = self.orientation.label(), to = orientation.label(), "orientation changed");
        self.freeze.engage(&self.rendered, now);
        self.orientation = orientation;
        self.item_extent = self.measure();
        self.layout_surfaces(now);
        self.issue_scroll(Target::CURRENT, ScrollBehavior::Instant, now);
        self.settle(now);
        true
    }

    /// Keyboard "next".
    pub fn next(&mut self, now: Instant) {
        self.change_item(Target::NEXT, ScrollBehavior::Instant, now);
    }

    /// Keyboard "previous".
    pub fn previous(&mut self, now: Instant) {
        self.change_item(Target::PREVIOUS, ScrollBehavior::Instant, now);
    }

    /// Navigation callback given to the item renderer.
    ///
    /// Issues the scroll and the index write together; neither waits on the
    /// other.
    pub fn change_item(&mut self, target: Target, behavior: ScrollBehavior, now: Instant) {
        self.issue_scroll(target, behavior, now);
        self.store.set_index_immediate(target, now);
        self.settle(now);
    }

    /// Scrolls the active surface to `target` without writing the index.
    pub fn scroll_to_index(
        &mut self,
        target: Target,
        behavior: ScrollBehavior,
        now: Instant,
    ) -> Option<ScrollCommand> {
        let command = self.issue_scroll(target, behavior, now);
        self.settle(now);
        command
    }

    /// Writes the working index directly and schedules a publish.
    pub fn set_index_immediate(&mut self, target: Target, now: Instant) -> usize {
        self.store.set_index_immediate(target, now)
    }

    /// A user scroll of `delta` cells on the active surface.
    pub fn wheel(&mut self, delta: i64, now: Instant) {
        let orientation = self.orientation;
        if let Some(surfaces) = &mut self.surfaces {
            surfaces.split_mut(orientation).0.scroll_by(delta, now);
        }
        self.settle(now);
    }

    /// Advances every timer to `now` and returns the resulting effects.
    pub fn tick(&mut self, now: Instant) -> Vec<FeedEffect> {
        if let Some(index) = self.store.poll(now) {
            self.effects.push(FeedEffect::Published(index));
            self.check_prefetch();
        }

        if let Some(surfaces) = &mut self.surfaces {
            for surface in surfaces.each_mut() {
                surface.tick(now);
            }
        }
        self.settle(now);

        if self.scroll.poll(now) {
            self.sync_snap(now);
        }
        if self.freeze.poll(now) {
            self.reconcile(now);
        }
        if self.activity.fire(now) {
            self.actively_scrolling = false;
        }

        std::mem::take(&mut self.effects)
    }

    // ------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------

    /// Indices to render: the frozen set during a freeze, else the live range.
    pub fn render_set(&self) -> &[usize] {
        &self.rendered
    }

    /// Signals for the item renderer.
    pub fn item_props(&self, index: usize) -> ItemProps {
        ItemProps {
            index,
            is_current: index == self.store.published(),
            is_actively_scrolling: self.actively_scrolling,
        }
    }

    /// Live virtual range of the active window.
    pub fn live_range(&self) -> &VirtualRange {
        &self.live
    }

    /// Active orientation.
    pub fn orientation(&self) -> OrientationMode {
        self.orientation
    }

    /// Item count indices are clamped against.
    pub fn item_count(&self) -> usize {
        self.store.item_count()
    }

    /// Measured extent of one item on the active axis.
    pub fn item_extent(&self) -> u32 {
        self.item_extent
    }

    /// Working index.
    pub fn working_index(&self) -> usize {
        self.store.working()
    }

    /// Published index.
    pub fn published_index(&self) -> usize {
        self.store.published()
    }

    /// Offset of the active surface, if attached.
    pub fn scroll_offset(&self) -> Option<u64> {
        self.surfaces
            .as_ref()
            .map(|s| s.get(self.orientation).offset())
    }

    /// Whether the active surface currently snaps.
    pub fn snap_enabled(&self) -> Option<bool> {
        self.surfaces
            .as_ref()
            .map(|s| s.get(self.orientation).snap_enabled())
    }

    /// Scroll commands issued across both surfaces.
    pub fn scroll_commands_issued(&self) -> u64 {
        self.surfaces
            .as_ref()
            .map_or(0, |s| s.document.commands_issued() + s.container.commands_issued())
    }

    /// Whether scroll-snap is suspended for a programmatic scroll.
    pub fn is_snap_suspended(&self) -> bool {
        self.scroll.is_snap_suspended()
    }

    /// Whether the render set is frozen.
    pub fn is_frozen(&self) -> bool {
        self.freeze.is_frozen()
    }

    /// Whether a scroll event was seen within the scrolling reset delay.
    pub fn is_actively_scrolling(&self) -> bool {
        self.actively_scrolling
    }

    /// Coarse state.
    pub fn phase(&self) -> FeedPhase {
        if self.scroll.is_snap_suspended() {
            FeedPhase::ProgrammaticScroll
        } else {
            FeedPhase::Idle
        }
    }

    /// The earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let mut next = earliest(self.store.next_deadline(), self.scroll.reenable_at());
        next = earliest(next, self.freeze.next_deadline());
        next = earliest(next, self.activity.deadline());
        if let Some(surfaces) = &self.surfaces {
            next = earliest(next, surfaces.document.next_deadline());
            next = earliest(next, surfaces.container.next_deadline());
        }
        next
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn measure(&self) -> u32 {
        window_for(self.orientation).measure(self.pane).unwrap_or(0)
    }

    fn layout_surfaces(&mut self, now: Instant) {
        let pane = self.pane;
        let item_count = self.store.item_count() as u64;
        if let Some(surfaces) = &mut self.surfaces {
            for surface in surfaces.each_mut() {
                let extent = pane.along(surface.axis());
                surface.set_layout(extent, item_count * u64::from(extent), extent, now);
            }
        }
    }

    fn issue_scroll(
        &mut self,
        target: Target,
        behavior: ScrollBehavior,
        now: Instant,
    ) -> Option<ScrollCommand> {
        let orientation = self.orientation;
        let surface = self
            .surfaces
            .as_mut()
            .map(|s| s.split_mut(orientation).0);
        let command = self.scroll.scroll_to_index(
            target,
            behavior,
            self.store.working(),
            self.store.item_count(),
            self.item_extent,
            surface,
            now,
        );
        if command.is_some() {
            self.sync_snap(now);
        }
        command
    }

    fn sync_snap(&mut self, now: Instant) {
        let enabled = !self.scroll.is_snap_suspended();
        if let Some(surfaces) = &mut self.surfaces {
            for surface in surfaces.each_mut() {
                surface.set_snap_enabled(enabled, now);
            }
        }
    }

    /// Drains scroll events from the active surface and reconciles.
    fn settle(&mut self, now: Instant) {
        let events = self.take_active_events();
        if let Some(last) = events.last() {
            tracing::trace!(count = events.len(), offset = last.offset, source = ?last.source, "scroll events");
        }
        for event in &events {
            self.scroll.on_scroll_event(event.at);
            self.actively_scrolling = true;
            self.activity
                .arm(event.at + Duration::from_millis(self.config.scrolling_reset_ms));
        }
        self.reconcile(now);
    }

    fn take_active_events(&mut self) -> Vec<ScrollEvent> {
        let orientation = self.orientation;
        let Some(surfaces) = &mut self.surfaces else {
            return Vec::new();
        };
        let (active, inactive) = surfaces.split_mut(orientation);
        inactive.take_events();
        active.take_events()
    }

    /// Recomputes the mounted range and lets the detector correct the index.
    fn reconcile(&mut self, now: Instant) {
        let (offset, viewport_extent) = self
            .surfaces
            .as_ref()
            .map(|s| {
                let active = s.get(self.orientation);
                (active.offset(), active.viewport_extent())
            })
            .unwrap_or((0, 0));

        self.live = window_for(self.orientation).compute(
            self.store.item_count(),
            self.item_extent,
            offset,
            viewport_extent,
            self.config.overscan,
        );
        let rendered = self.freeze.resolve(&self.live.indices);
        if rendered != self.rendered.as_slice() {
            self.rendered = rendered.to_vec();
            tracing::trace!(rendered = ?self.rendered, "render set changed");
        }

        if self.surfaces.is_none() {
            return;
        }
        self.detector.resync(&self.rendered);
        let entries = self.detector.collect(Viewport {
            offset,
            extent: viewport_extent,
            item_extent: self.item_extent,
        });
        if let Some(index) = self.detector.select(&entries, self.store.working()) {
            tracing::debug!(index, "most visible item changed");
            self.store.set_index_immediate(Target::from(index), now);
        }
    }

    fn check_prefetch(&mut self) {
        let item_count = self.store.item_count();
        let published = self.store.published();
        if published + self.config.prefetch_margin >= item_count {
            tracing::debug!(published, item_count, "near the loaded tail, requesting more items");
            self.effects.push(FeedEffect::LoadMore { item_count });
        }
    }
}
