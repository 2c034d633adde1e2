//! Integration tests for orientation changes: the render set stays frozen
//! while the window variant swaps, and the new surface is re-anchored.

use std::time::{Duration, Instant};

use reelfeed_core::freeze::FreezeGuard;
use reelfeed_core::{
    FeedConfig, FeedController, OrientationMode, PaneSize, ScrollBehavior, Target,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Portrait feed in a 100x40 pane parked on item 5.
fn parked(t0: Instant) -> FeedController {
    let mut feed = FeedController::new(FeedConfig::default(), OrientationMode::Portrait);
    feed.set_item_count(20, t0);
    feed.attach(PaneSize::new(100, 40), t0);
    feed.change_item(Target::Absolute(5), ScrollBehavior::Instant, t0);
    feed.tick(t0 + ms(300));
    feed
}

#[test]
fn orientation_change_reanchors_on_the_new_axis() {
    let t0 = Instant::now();
    let mut feed = parked(t0);
    let t1 = t0 + ms(1000);

    assert!(feed.set_orientation(OrientationMode::ForcedLandscape, t1));
    assert!(!feed.set_orientation(OrientationMode::ForcedLandscape, t1));
    assert_eq!(feed.orientation(), OrientationMode::ForcedLandscape);
    assert_eq!(feed.item_extent(), 100);
    assert_eq!(feed.scroll_offset(), Some(500));
    assert_eq!(feed.working_index(), 5);
    assert!(feed.is_frozen());
}

#[test]
fn render_set_holds_while_frozen() {
    let t0 = Instant::now();
    let mut feed = parked(t0);
    let t1 = t0 + ms(1000);
    assert_eq!(feed.render_set(), &[4, 5, 6]);

    feed.set_orientation(OrientationMode::ForcedLandscape, t1);
    feed.wheel(150, t1 + ms(10));
    assert_eq!(feed.live_range().indices, vec![5, 6, 7, 8]);
    assert_eq!(feed.render_set(), &[4, 5, 6]);

    feed.tick(t1 + ms(99));
    assert!(feed.is_frozen());
    feed.tick(t1 + ms(100));
    assert!(!feed.is_frozen());
    assert_eq!(feed.render_set(), feed.live_range().indices.as_slice());
}

#[test]
fn toggling_again_restarts_a_single_freeze() {
    let t0 = Instant::now();
    let mut feed = parked(t0);
    let t1 = t0 + ms(1000);

    feed.set_orientation(OrientationMode::ForcedLandscape, t1);
    feed.set_orientation(OrientationMode::Portrait, t1 + ms(50));
    assert_eq!(feed.render_set(), &[4, 5, 6]);

    feed.tick(t1 + ms(100));
    assert!(feed.is_frozen(), "the first release was superseded");
    feed.tick(t1 + ms(150));
    assert!(!feed.is_frozen());
    assert_eq!(feed.scroll_offset(), Some(200));
    assert_eq!(feed.render_set(), &[4, 5, 6]);
}

#[test]
fn guard_resolves_live_set_when_idle() {
    let t0 = Instant::now();
    let mut guard = FreezeGuard::default();
    let live = [7, 8, 9];
    assert_eq!(guard.resolve(&live), &live);

    guard.engage(&[1, 2], t0);
    assert_eq!(guard.resolve(&live), &[1, 2]);
    assert_eq!(guard.next_deadline(), Some(t0 + ms(100)));

    guard.cancel();
    assert!(!guard.is_frozen());
    assert!(!guard.poll(t0 + ms(100)));
}
