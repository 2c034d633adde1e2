//! Integration tests for the index store: immediate writes, trailing-edge
//! publishing and clamping.

use std::time::{Duration, Instant};

use reelfeed_core::store::IndexStore;
use reelfeed_core::Target;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn store_with(count: usize) -> IndexStore {
    let mut store = IndexStore::default();
    store.set_item_count(count);
    store
}

#[test]
fn burst_publishes_latest_value_once() {
    let t0 = Instant::now();
    let mut store = store_with(20);

    store.set_index_immediate(Target::Absolute(1), t0);
    store.set_index_immediate(Target::Absolute(2), t0 + ms(50));
    store.set_index_immediate(Target::Absolute(3), t0 + ms(90));

    assert_eq!(store.working(), 3, "working is written synchronously");
    assert_eq!(store.poll(t0 + ms(99)), None, "window still open");
    assert_eq!(store.published(), 0);

    assert_eq!(store.poll(t0 + ms(100)), Some(3));
    assert_eq!(store.poll(t0 + ms(200)), None, "exactly one publish per window");
}

#[test]
fn window_is_not_extended_by_later_writes() {
    let t0 = Instant::now();
    let mut store = store_with(20);
    store.set_index_immediate(Target::NEXT, t0);
    store.set_index_immediate(Target::NEXT, t0 + ms(99));
    assert_eq!(store.next_deadline(), Some(t0 + ms(100)));
    assert_eq!(store.poll(t0 + ms(100)), Some(2));
}

#[test]
fn relative_targets_compose_against_working_index() {
    let t0 = Instant::now();
    let mut store = store_with(20);
    store.set_index_immediate(Target::Absolute(5), t0);
    store.poll(t0 + ms(100));

    for (i, at) in [0, 40, 80].into_iter().enumerate() {
        let working = store.set_index_immediate(Target::NEXT, t0 + ms(1000 + at));
        assert_eq!(working, 6 + i);
    }
    assert_eq!(store.published(), 5, "published lags until the window closes");
    assert_eq!(store.poll(t0 + ms(1100)), Some(8));
}

#[test]
fn every_write_is_clamped() {
    let t0 = Instant::now();
    let mut store = store_with(10);
    assert_eq!(store.set_index_immediate(Target::Absolute(42), t0), 9);
    assert_eq!(store.set_index_immediate(Target::Absolute(-3), t0), 0);
    assert_eq!(store.set_index_immediate(Target::PREVIOUS, t0), 0);

    let mut empty = IndexStore::default();
    assert_eq!(empty.set_index_immediate(Target::NEXT, t0), 0);
}

#[test]
fn republishing_the_same_index_is_silent() {
    let t0 = Instant::now();
    let mut store = store_with(10);
    store.set_index_immediate(Target::Absolute(4), t0);
    assert_eq!(store.poll(t0 + ms(100)), Some(4));

    store.set_index_immediate(Target::Absolute(5), t0 + ms(150));
    store.set_index_immediate(Target::Absolute(4), t0 + ms(160));
    assert_eq!(store.poll(t0 + ms(250)), None);
    assert_eq!(store.published(), 4);
}

#[test]
fn item_count_only_grows() {
    let mut store = store_with(10);
    assert!(!store.set_item_count(5));
    assert_eq!(store.item_count(), 10);
    assert!(store.set_item_count(20));
}

#[test]
fn cancel_drops_pending_publish() {
    let t0 = Instant::now();
    let mut store = store_with(10);
    store.set_index_immediate(Target::Absolute(7), t0);
    store.cancel();
    assert_eq!(store.next_deadline(), None);
    assert_eq!(store.poll(t0 + ms(500)), None);
    assert_eq!(store.working(), 7);
}
