//! Scroll surfaces.
//!
//! A [`ScrollSurface`] is the scroll container one window variant drives: it
//! owns a clamped scroll offset along one axis, runs smooth-scroll animations,
//! applies scroll-snap after user scrolling settles, and records every offset
//! change as a [`ScrollEvent`]. The feed controller owns one surface per
//! window variant and drains their events after each handler.

use std::time::{Duration, Instant};

use crate::timer::{earliest, Deadline};
use crate::window::Axis;

/// How a programmatic scroll reaches its destination.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump straight to the destination.
    Instant,
    /// Animate to the destination.
    #[default]
    Smooth,
}

/// What moved the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSource {
    /// A `scroll_to` command (instant, or a smooth-scroll animation step).
    Programmatic,
    /// Wheel or drag input.
    User,
    /// Scroll-snap aligning the offset to an item boundary.
    Snap,
    /// The offset was clamped after the content or viewport shrank.
    Layout,
}

/// One change of scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    /// New offset.
    pub offset: u64,
    /// Cause of the change.
    pub source: ScrollSource,
    /// When it happened.
    pub at: Instant,
}

/// Animation and snap timings of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceTimings {
    /// Length of a smooth-scroll animation.
    pub smooth_scroll: Duration,
    /// Quiet period after user scrolling before snapping.
    pub snap_settle: Duration,
}

impl Default for SurfaceTimings {
    fn default() -> Self {
        Self {
            smooth_scroll: Duration::from_millis(200),
            snap_settle: Duration::from_millis(150),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: u64,
    to: u64,
    start: Instant,
    duration: Duration,
    source: ScrollSource,
}

impl Tween {
    fn new(from: u64, to: u64, start: Instant, duration: Duration, source: ScrollSource) -> Self {
        Self {
            from,
            to,
            start,
            duration: duration.max(Duration::from_millis(1)),
            source,
        }
    }

    fn end(&self) -> Instant {
        self.start + self.duration
    }

    fn is_done(&self, now: Instant) -> bool {
        now >= self.end()
    }

    fn sample(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.start);
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        let eased = smoothstep(t);
        let from = self.from as f64;
        let to = self.to as f64;
        (from + (to - from) * eased).round().max(0.0) as u64
    }
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// A scroll container along one axis.
#[derive(Debug, Clone)]
pub struct ScrollSurface {
    axis: Axis,
    timings: SurfaceTimings,
    viewport_extent: u32,
    content_extent: u64,
    snap_interval: u32,
    offset: u64,
    snap_enabled: bool,
    tween: Option<Tween>,
    settle: Deadline,
    events: Vec<ScrollEvent>,
    commands_issued: u64,
}

impl ScrollSurface {
    /// Creates an empty surface with scroll-snap enabled.
    pub fn new(axis: Axis, timings: SurfaceTimings) -> Self {
        Self {
            axis,
            timings,
            viewport_extent: 0,
            content_extent: 0,
            snap_interval: 0,
            offset: 0,
            snap_enabled: true,
            tween: None,
            settle: Deadline::default(),
            events: Vec::new(),
            commands_issued: 0,
        }
    }

    /// Scroll axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Current offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Length of the visible part along the axis.
    pub fn viewport_extent(&self) -> u32 {
        self.viewport_extent
    }

    /// Total scrollable length.
    pub fn content_extent(&self) -> u64 {
        self.content_extent
    }

    /// Largest reachable offset.
    pub fn max_offset(&self) -> u64 {
        self.content_extent
            .saturating_sub(u64::from(self.viewport_extent))
    }

    /// Whether scroll-snap is currently active.
    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    /// Whether a smooth-scroll or snap animation is running.
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Number of `scroll_to` commands received so far.
    pub fn commands_issued(&self) -> u64 {
        self.commands_issued
    }

    /// Updates viewport and content lengths, clamping the offset into range.
    ///
    /// `snap_interval` is the item extent that snap points are spaced by.
    pub fn set_layout(&mut self, viewport_extent: u32, content_extent: u64, snap_interval: u32, now: Instant) {
        self.viewport_extent = viewport_extent;
        self.content_extent = content_extent;
        self.snap_interval = snap_interval;
        if let Some(tween) = &mut self.tween {
            tween.to = tween.to.min(self.content_extent.saturating_sub(u64::from(viewport_extent)));
        }
        let clamped = self.offset.min(self.max_offset());
        self.move_to(clamped, ScrollSource::Layout, now);
    }

    /// Turns scroll-snap on or off.
    ///
    /// Re-enabling snap while the offset sits between snap points schedules an
    /// immediate snap, matching how a scroll container re-snaps when its snap
    /// type is restored.
    pub fn set_snap_enabled(&mut self, enabled: bool, now: Instant) {
        if self.snap_enabled == enabled {
            return;
        }
        self.snap_enabled = enabled;
        if enabled {
            self.settle.arm(now);
        } else {
            self.settle.cancel();
        }
    }

    /// Programmatic scroll to `offset` (clamped).
    pub fn scroll_to(&mut self, offset: u64, behavior: ScrollBehavior, now: Instant) {
        self.commands_issued += 1;
        let target = offset.min(self.max_offset());
        match behavior {
            ScrollBehavior::Instant => {
                self.tween = None;
                self.move_to(target, ScrollSource::Programmatic, now);
            }
            ScrollBehavior::Smooth => {
                let from = self.tween.take().map_or(self.offset, |t| t.sample(now));
                if from == target {
                    self.move_to(target, ScrollSource::Programmatic, now);
                } else {
                    self.tween = Some(Tween::new(
                        from,
                        target,
                        now,
                        self.timings.smooth_scroll,
                        ScrollSource::Programmatic,
                    ));
                }
            }
        }
    }

    /// User scroll by `delta` cells. Interrupts any running animation.
    pub fn scroll_by(&mut self, delta: i64, now: Instant) {
        self.tween = None;
        let target = if delta.is_negative() {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta.unsigned_abs())
        }
        .min(self.max_offset());
        self.move_to(target, ScrollSource::User, now);
        if self.snap_enabled {
            self.settle.arm_after(now, self.timings.snap_settle);
        }
    }

    /// Advances animations and pending snaps to `now`.
    pub fn tick(&mut self, now: Instant) {
        if let Some(tween) = self.tween {
            let next = tween.sample(now).min(self.max_offset());
            self.move_to(next, tween.source, now);
            if tween.is_done(now) {
                self.tween = None;
            }
        }

        if self.settle.fire(now) && self.snap_enabled && self.tween.is_none() {
            let target = self.nearest_snap_point();
            if target != self.offset {
                self.tween = Some(Tween::new(
                    self.offset,
                    target,
                    now,
                    self.timings.smooth_scroll,
                    ScrollSource::Snap,
                ));
            }
        }
    }

    /// Takes the scroll events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<ScrollEvent> {
        std::mem::take(&mut self.events)
    }

    /// The next instant this surface needs a `tick`.
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest(self.tween.map(|t| t.end()), self.settle.deadline())
    }

    /// Stops animations and pending snaps, and drops unread events.
    pub fn cancel(&mut self) {
        self.tween = None;
        self.settle.cancel();
        self.events.clear();
    }

    fn nearest_snap_point(&self) -> u64 {
        if self.snap_interval == 0 {
            return self.offset;
        }
        let interval = u64::from(self.snap_interval);
        let below = self.offset / interval * interval;
        let above = below + interval;
        let nearest = if self.offset - below < above - self.offset {
            below
        } else {
            above
        };
        nearest.min(self.max_offset())
    }

    fn move_to(&mut self, offset: u64, source: ScrollSource, at: Instant) {
        if offset == self.offset {
            return;
        }
        self.offset = offset;
        self.events.push(ScrollEvent { offset, source, at });
    }
}
