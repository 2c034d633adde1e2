//! Integration tests for programmatic scrolling against a scroll surface:
//! snap suspension, its extension by scroll events, and re-enabling.

use std::time::{Duration, Instant};

use reelfeed_core::scroll::ScrollController;
use reelfeed_core::surface::{ScrollSource, ScrollSurface, SurfaceTimings};
use reelfeed_core::window::Axis;
use reelfeed_core::{ScrollBehavior, Target};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// A vertical surface 40 cells tall holding 20 items of 40 cells.
fn surface(t0: Instant) -> ScrollSurface {
    let mut s = ScrollSurface::new(Axis::Vertical, SurfaceTimings::default());
    s.set_layout(40, 800, 40, t0);
    s
}

#[test]
fn scroll_is_a_noop_without_a_surface_or_measurement() {
    let t0 = Instant::now();
    let mut scroll = ScrollController::default();
    assert!(scroll
        .scroll_to_index(Target::NEXT, ScrollBehavior::Instant, 0, 20, 40, None, t0)
        .is_none());

    let mut s = surface(t0);
    assert!(scroll
        .scroll_to_index(Target::NEXT, ScrollBehavior::Instant, 0, 0, 40, Some(&mut s), t0)
        .is_none());
    assert!(scroll
        .scroll_to_index(Target::NEXT, ScrollBehavior::Instant, 0, 20, 0, Some(&mut s), t0)
        .is_none());
    assert!(!scroll.is_snap_suspended());
    assert_eq!(s.commands_issued(), 0);
}

#[test]
fn instant_scroll_targets_index_times_extent() {
    let t0 = Instant::now();
    let mut scroll = ScrollController::default();
    let mut s = surface(t0);

    let cmd = scroll
        .scroll_to_index(Target::Absolute(7), ScrollBehavior::Instant, 0, 20, 40, Some(&mut s), t0)
        .unwrap();
    assert_eq!(cmd.index, 7);
    assert_eq!(cmd.offset, 280);
    assert_eq!(s.offset(), 280);
    assert!(!s.snap_enabled());
    assert!(scroll.is_snap_suspended());

    let events = s.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].source, ScrollSource::Programmatic);
}

#[test]
fn scroll_events_push_back_reenable() {
    let t0 = Instant::now();
    let mut scroll = ScrollController::default();
    let mut s = surface(t0);

    scroll.scroll_to_index(Target::NEXT, ScrollBehavior::Instant, 0, 20, 40, Some(&mut s), t0);
    assert_eq!(scroll.reenable_at(), Some(t0 + ms(100)));

    scroll.on_scroll_event(t0 + ms(60));
    assert_eq!(scroll.reenable_at(), Some(t0 + ms(160)));

    assert!(!scroll.poll(t0 + ms(159)));
    assert!(scroll.poll(t0 + ms(160)));
    assert!(!scroll.is_snap_suspended());

    // Not suspended: events no longer arm anything.
    scroll.on_scroll_event(t0 + ms(200));
    assert!(!scroll.is_snap_suspended());
}

#[test]
fn smooth_scroll_keeps_snap_off_until_the_surface_is_still() {
    let t0 = Instant::now();
    let mut scroll = ScrollController::default();
    let mut s = surface(t0);

    scroll.scroll_to_index(Target::Absolute(3), ScrollBehavior::Smooth, 0, 20, 40, Some(&mut s), t0);
    let mut now = t0;
    while now <= t0 + ms(200) {
        s.tick(now);
        for event in s.take_events() {
            scroll.on_scroll_event(event.at);
        }
        assert!(!scroll.poll(now), "suspended while animating");
        now += ms(20);
    }
    assert_eq!(s.offset(), 120);
    assert_eq!(scroll.reenable_at(), Some(t0 + ms(300)));
    assert!(scroll.poll(t0 + ms(300)));
}

#[test]
fn reenabling_snap_aligns_a_stray_offset() {
    let t0 = Instant::now();
    let mut s = surface(t0);
    s.set_snap_enabled(false, t0);
    s.scroll_by(30, t0);
    s.take_events();

    s.set_snap_enabled(true, t0 + ms(10));
    s.tick(t0 + ms(10));
    s.tick(t0 + ms(210));
    assert_eq!(s.offset(), 40);
    assert!(s
        .take_events()
        .iter()
        .all(|e| e.source == ScrollSource::Snap));
}
