//! Central application state for reelfeed.
//!
//! Owns the feed controller, the settings store, the loaded feed entries and
//! the bookkeeping for catalog loads. No ratatui rendering lives here; the
//! render module reads this state and the keybinding dispatcher mutates it.

use std::time::Instant;

use crossbeam_channel::Sender;
use reelfeed_core::settings::SettingsStore;
use reelfeed_core::signal::Subscription;
use reelfeed_core::types::FeedEntry;
use reelfeed_core::{FeedConfig, FeedController, FeedEffect, PaneSize};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::{AppEvent, SettingsChange};
use crate::loader::types::{LoadRequest, MediaPage};

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Feed navigation (default).
    #[default]
    Normal,
    /// Help overlay shown above the feed.
    HelpOverlay,
}

/// Settings subscriptions that forward changes onto the event bus.
#[derive(Debug)]
struct SettingsForwarding {
    orientation: Subscription,
    debug_mode: Subscription,
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    pub mode: Mode,
    /// Scroll offset of the help overlay.
    pub help_scroll: u16,

    /// The synchronization engine.
    pub feed: FeedController,
    /// Observable user settings.
    pub settings: SettingsStore,
    /// Loaded entries; index `i` is feed item `i`.
    pub entries: Vec<FeedEntry>,

    /// Inner size of the feed pane, cached after each render.
    pub feed_pane: PaneSize,

    page_size: usize,
    wrap: bool,
    /// Catalog position of the next page.
    next_offset: usize,
    /// Offset of the request in flight, if any.
    pending_load: Option<usize>,
    /// Set once the catalog has nothing more to give and wrapping is off.
    exhausted: bool,
    loader_tx: Option<Sender<LoadRequest>>,
    forwarding: Option<SettingsForwarding>,
}

impl AppState {
    /// Creates the state with a detached feed in the orientation `settings`
    /// asks for.
    pub fn new(feed_config: FeedConfig, settings: SettingsStore, page_size: usize, wrap: bool) -> Self {
        let orientation = settings.orientation().get();
        Self {
            mode: Mode::default(),
            help_scroll: 0,
            feed: FeedController::new(feed_config, orientation),
            settings,
            entries: Vec::new(),
            feed_pane: PaneSize::default(),
            page_size: page_size.max(1),
            wrap,
            next_offset: 0,
            pending_load: None,
            exhausted: false,
            loader_tx: None,
            forwarding: None,
        }
    }

    /// Connects the loader thread.
    pub fn with_loader(mut self, tx: Sender<LoadRequest>) -> Self {
        self.loader_tx = Some(tx);
        self
    }

    /// Publishes orientation and debug mode changes as
    /// `AppEvent::SettingsChanged`. Replaces any earlier forwarding.
    pub fn forward_settings(&mut self, tx: &UnboundedSender<AppEvent>) {
        self.stop_forwarding_settings();
        let orientation_tx = tx.clone();
        let orientation = self.settings.on_orientation_change(move |orientation| {
            let _ = orientation_tx.send(AppEvent::SettingsChanged(SettingsChange::Orientation(orientation)));
        });
        let debug_tx = tx.clone();
        let debug_mode = self.settings.on_debug_mode_change(move |enabled| {
            let _ = debug_tx.send(AppEvent::SettingsChanged(SettingsChange::DebugMode(enabled)));
        });
        self.forwarding = Some(SettingsForwarding { orientation, debug_mode });
    }

    /// Tears down the settings subscriptions. Returns `false` if none were
    /// active.
    pub fn stop_forwarding_settings(&mut self) -> bool {
        let Some(forwarding) = self.forwarding.take() else {
            return false;
        };
        let orientation = self.settings.unsubscribe_orientation(forwarding.orientation);
        let debug_mode = self.settings.unsubscribe_debug_mode(forwarding.debug_mode);
        orientation && debug_mode
    }

    /// Whether a catalog request is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// The entry at the published index.
    pub fn current_entry(&self) -> Option<&FeedEntry> {
        self.entries.get(self.feed.published_index())
    }

    /// Advances the feed to `now` and acts on its effects.
    pub fn tick(&mut self, now: Instant) {
        let effects = self.feed.tick(now);
        self.apply_effects(effects);
    }

    /// Acts on feed effects: loads more media near the tail.
    pub fn apply_effects(&mut self, effects: Vec<FeedEffect>) {
        for effect in effects {
            match effect {
                FeedEffect::Published(index) => {
                    if let Some(entry) = self.entries.get(index) {
                        tracing::info!(index, title = %entry.item.title, "now playing");
                    }
                }
                FeedEffect::LoadMore { .. } => {
                    self.request_more();
                }
            }
        }
    }

    /// Sends the next page request unless one is already in flight.
    ///
    /// Returns `true` if a request was sent.
    pub fn request_more(&mut self) -> bool {
        if self.pending_load.is_some() || self.exhausted {
            return false;
        }
        let Some(tx) = &self.loader_tx else {
            return false;
        };
        let request = LoadRequest::Page {
            offset: self.next_offset,
            limit: self.page_size,
        };
        if tx.send(request).is_err() {
            tracing::warn!("loader thread is gone");
            return false;
        }
        tracing::debug!(offset = self.next_offset, limit = self.page_size, "requested media page");
        self.pending_load = Some(self.next_offset);
        true
    }

    /// Appends a loaded page to the feed.
    ///
    /// Pages that do not answer the request in flight are dropped. When the
    /// catalog runs out, loading restarts from the first item if wrapping is
    /// on; each placement gets its own key so repeats are distinct entries.
    pub fn apply_page(&mut self, page: MediaPage, now: Instant) {
        if self.pending_load != Some(page.offset) {
            tracing::debug!(offset = page.offset, "dropping stale media page");
            return;
        }
        self.pending_load = None;

        if page.failed {
            // Not the end of the catalog; the next prefetch check retries.
            tracing::warn!(offset = page.offset, "media page failed to load");
            return;
        }

        let loaded = page.items.len();
        if loaded == 0 {
            if self.wrap && page.offset > 0 && page.total > 0 {
                tracing::debug!("catalog exhausted, wrapping around");
                self.next_offset = 0;
                self.request_more();
            } else {
                tracing::info!(total = page.total, "no more media to load");
                self.exhausted = true;
            }
            return;
        }

        self.entries.extend(page.items.into_iter().map(FeedEntry::new));
        self.next_offset = page.offset + loaded;
        if loaded < self.page_size {
            if self.wrap {
                self.next_offset = 0;
            } else {
                self.exhausted = true;
            }
        }
        self.feed.set_item_count(self.entries.len(), now);
        self.tick(now);
    }

    /// Records the feed pane size; attaches the feed on first call.
    pub fn resize_feed(&mut self, pane: PaneSize, now: Instant) {
        if pane == self.feed_pane && self.feed.is_attached() {
            return;
        }
        self.feed_pane = pane;
        if self.feed.is_attached() {
            self.feed.resize(pane, now);
        } else {
            self.feed.attach(pane, now);
        }
        self.tick(now);
    }

    /// Brings the feed orientation in line with the settings.
    pub fn sync_orientation(&mut self, now: Instant) {
        let orientation = self.settings.orientation().get();
        if self.feed.set_orientation(orientation, now) {
            self.tick(now);
        }
    }

    /// Flips forced landscape and applies it.
    pub fn toggle_landscape(&mut self, now: Instant) {
        self.settings.toggle_force_landscape();
        self.sync_orientation(now);
    }

    /// Flips the orientation-matching filter.
    pub fn toggle_matching_orientation(&mut self) {
        self.settings.toggle_only_show_matching_orientation();
    }

    /// Flips debug mode.
    pub fn toggle_debug(&mut self) {
        self.settings.toggle_debug_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelfeed_core::types::MediaItem;
    use reelfeed_core::OrientationMode;
    use std::time::Duration;

    fn item(i: usize) -> MediaItem {
        MediaItem {
            id: format!("id-{i}"),
            path: format!("/clips/{i}.mp4"),
            title: format!("clip {i}"),
            size_bytes: 1,
            added_at: 0,
        }
    }

    fn page(offset: usize, n: usize, total: usize) -> MediaPage {
        MediaPage {
            offset,
            items: (offset..offset + n).map(item).collect(),
            total,
            failed: false,
        }
    }

    fn state(wrap: bool) -> (AppState, crossbeam_channel::Receiver<LoadRequest>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let state = AppState::new(FeedConfig::default(), SettingsStore::default(), 4, wrap)
            .with_loader(tx);
        (state, rx)
    }

    #[test]
    fn attaching_an_empty_feed_requests_the_first_page() {
        let (mut state, rx) = state(true);
        state.resize_feed(PaneSize::new(80, 20), Instant::now());
        assert_eq!(rx.try_recv().unwrap(), LoadRequest::Page { offset: 0, limit: 4 });
        assert!(state.is_loading());
        assert!(!state.request_more(), "one request in flight at a time");
    }

    #[test]
    fn pages_grow_the_feed() {
        let (mut state, rx) = state(true);
        let t0 = Instant::now();
        state.resize_feed(PaneSize::new(80, 20), t0);
        rx.try_recv().unwrap();

        state.apply_page(page(0, 4, 10), t0);
        assert_eq!(state.entries.len(), 4);
        assert_eq!(state.feed.item_count(), 4);
        // Still within the prefetch margin of the tail.
        assert_eq!(rx.try_recv().unwrap(), LoadRequest::Page { offset: 4, limit: 4 });

        // A late duplicate is ignored.
        state.apply_page(page(0, 4, 10), t0);
        assert_eq!(state.entries.len(), 4);
    }

    #[test]
    fn short_page_wraps_to_the_start_with_fresh_keys() {
        let (mut state, rx) = state(true);
        let t0 = Instant::now();
        state.resize_feed(PaneSize::new(80, 20), t0);
        rx.try_recv().unwrap();

        state.apply_page(page(0, 2, 2), t0);
        assert_eq!(rx.try_recv().unwrap(), LoadRequest::Page { offset: 0, limit: 4 });
        state.apply_page(page(0, 2, 2), t0 + Duration::from_millis(1));
        assert_eq!(state.entries.len(), 4);
        assert_eq!(state.entries[0].item, state.entries[2].item);
        assert_ne!(state.entries[0].key, state.entries[2].key);
    }

    #[test]
    fn without_wrap_the_feed_ends() {
        let (mut state, rx) = state(false);
        let t0 = Instant::now();
        state.resize_feed(PaneSize::new(80, 20), t0);
        rx.try_recv().unwrap();

        state.apply_page(page(0, 3, 3), t0);
        assert!(!state.request_more());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn landscape_toggle_swaps_the_feed_orientation() {
        let (mut state, _rx) = state(true);
        let t0 = Instant::now();
        state.resize_feed(PaneSize::new(80, 20), t0);
        state.toggle_landscape(t0);
        assert!(state.settings.force_landscape());
        assert_eq!(state.feed.orientation(), OrientationMode::ForcedLandscape);
        assert_eq!(state.feed.item_extent(), 80);
    }

    #[test]
    fn failed_page_does_not_end_the_feed() {
        let (mut state, rx) = state(false);
        let t0 = Instant::now();
        state.resize_feed(PaneSize::new(80, 20), t0);
        rx.try_recv().unwrap();

        let failed = MediaPage {
            offset: 0,
            failed: true,
            ..MediaPage::default()
        };
        state.apply_page(failed, t0);
        assert!(!state.is_loading());
        assert!(state.request_more(), "a later prefetch retries the same page");
        assert_eq!(rx.try_recv().unwrap(), LoadRequest::Page { offset: 0, limit: 4 });
    }

    #[test]
    fn settings_changes_reach_the_event_bus_until_torn_down() {
        let (mut state, _rx) = state(true);
        let (tx, mut events) = tokio::sync::mpsc::unbounded_channel();
        let t0 = Instant::now();
        state.resize_feed(PaneSize::new(80, 20), t0);

        state.forward_settings(&tx);
        state.toggle_landscape(t0);
        state.toggle_debug();
        assert!(matches!(
            events.try_recv(),
            Ok(AppEvent::SettingsChanged(SettingsChange::Orientation(
                OrientationMode::ForcedLandscape
            )))
        ));
        assert!(matches!(
            events.try_recv(),
            Ok(AppEvent::SettingsChanged(SettingsChange::DebugMode(true)))
        ));

        assert!(state.stop_forwarding_settings());
        assert!(!state.stop_forwarding_settings());
        state.toggle_landscape(t0);
        state.toggle_debug();
        assert!(events.try_recv().is_err());
    }
}
