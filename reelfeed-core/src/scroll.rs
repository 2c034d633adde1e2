//! Programmatic scrolling and scroll-snap suspension.
//!
//! Scroll-snap fights programmatic scrolls: a smooth scroll that passes item
//! boundaries gets pulled back to the nearest snap point. Every scroll command
//! therefore suspends snapping first. The suspension is a single re-enable
//! timer that every scroll event observed while suspended pushes back, so it
//! only lifts once the surface has been still for the re-enable delay.

use std::time::{Duration, Instant};

use crate::index::Target;
use crate::surface::{ScrollBehavior, ScrollSurface};
use crate::timer::Deadline;

/// Default quiet period before scroll-snap is re-enabled.
pub const SNAP_REENABLE_DELAY: Duration = Duration::from_millis(100);

/// A scroll command that was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollCommand {
    /// Resolved target index.
    pub index: usize,
    /// Offset sent to the surface.
    pub offset: u64,
    /// Requested behaviour.
    pub behavior: ScrollBehavior,
}

/// Turns index targets into surface scroll commands.
#[derive(Debug, Clone)]
pub struct ScrollController {
    reenable_delay: Duration,
    reenable: Deadline,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(SNAP_REENABLE_DELAY)
    }
}

impl ScrollController {
    /// Creates a controller with the given snap re-enable delay.
    pub fn new(reenable_delay: Duration) -> Self {
        Self {
            reenable_delay,
            reenable: Deadline::default(),
        }
    }

    /// Whether scroll-snap is currently suspended.
    pub fn is_snap_suspended(&self) -> bool {
        self.reenable.is_armed()
    }

    /// When scroll-snap will be re-enabled, if suspended.
    pub fn reenable_at(&self) -> Option<Instant> {
        self.reenable.deadline()
    }

    /// Scrolls `surface` so that `target` starts at the leading edge.
    ///
    /// Relative targets resolve against `working`. The offset is computed
    /// directly as `index * item_extent` rather than asking the virtualizer to
    /// find a possibly unmounted item. Without a surface, an empty feed or an
    /// unmeasured extent this is a no-op.
    #[allow(clippy::too_many_arguments)]
    pub fn scroll_to_index(
        &mut self,
        target: Target,
        behavior: ScrollBehavior,
        working: usize,
        item_count: usize,
        item_extent: u32,
        surface: Option<&mut ScrollSurface>,
        now: Instant,
    ) -> Option<ScrollCommand> {
        let Some(surface) = surface else {
            tracing::debug!(?target, "scroll ignored: no scroll container attached");
            return None;
        };
        if item_count == 0 || item_extent == 0 {
            tracing::debug!(?target, item_count, item_extent, "scroll ignored: feed not measured");
            return None;
        }

        let index = target.resolve(working, item_count);
        let offset = index as u64 * u64::from(item_extent);

        self.suspend_snapping(now);
        surface.set_snap_enabled(false, now);
        tracing::debug!(index, offset, ?behavior, "scrolling to index");
        surface.scroll_to(offset, behavior, now);

        Some(ScrollCommand {
            index,
            offset,
            behavior,
        })
    }

    /// Records a scroll event; extends the suspension if one is active.
    pub fn on_scroll_event(&mut self, at: Instant) {
        if self.reenable.is_armed() {
            self.reenable.arm(at + self.reenable_delay);
        }
    }

    /// Lifts the suspension if it is due. Returns `true` when snapping resumes.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self.reenable.fire(now);
        if due {
            tracing::debug!("re-enabling scroll snapping");
        }
        due
    }

    /// Drops the suspension without firing it.
    pub fn cancel(&mut self) {
        self.reenable.cancel();
    }

    fn suspend_snapping(&mut self, now: Instant) {
        if !self.reenable.is_armed() {
            tracing::debug!("temporarily disabling scroll snapping");
        }
        self.reenable.arm(now + self.reenable_delay);
    }
}
