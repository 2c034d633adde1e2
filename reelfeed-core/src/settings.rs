//! User-facing settings shared between the feed and its chrome.

use crate::signal::{Mapped, Signal, Subscription};
use crate::window::OrientationMode;

/// Observable settings. Consumers subscribe instead of polling.
#[derive(Debug, Default)]
pub struct SettingsStore {
    force_landscape: Signal<bool>,
    debug_mode: Signal<bool>,
    only_show_matching_orientation: Signal<bool>,
}

impl SettingsStore {
    /// Creates a store with the given initial values.
    pub fn new(force_landscape: bool, debug_mode: bool) -> Self {
        Self {
            force_landscape: Signal::new(force_landscape),
            debug_mode: Signal::new(debug_mode),
            only_show_matching_orientation: Signal::new(false),
        }
    }

    /// Sets the initial `only_show_matching_orientation` value.
    pub fn with_only_show_matching_orientation(mut self, value: bool) -> Self {
        self.only_show_matching_orientation.set(value);
        self
    }

    pub fn force_landscape(&self) -> bool {
        *self.force_landscape.get()
    }

    pub fn debug_mode(&self) -> bool {
        *self.debug_mode.get()
    }

    /// Whether media is limited to the screen's orientation. Only surfaced
    /// in the debug stats.
    pub fn only_show_matching_orientation(&self) -> bool {
        *self.only_show_matching_orientation.get()
    }

    pub fn toggle_only_show_matching_orientation(&mut self) -> bool {
        self.only_show_matching_orientation.update(|v| !v)
    }

    /// Orientation derived from `force_landscape`.
    pub fn orientation(&self) -> Mapped<'_, bool, OrientationMode> {
        self.force_landscape.map(OrientationMode::from_force_landscape)
    }

    /// Sets `force_landscape`. Returns `true` if it changed.
    pub fn set_force_landscape(&mut self, value: bool) -> bool {
        self.force_landscape.set(value)
    }

    pub fn toggle_force_landscape(&mut self) -> bool {
        self.force_landscape.update(|v| !v)
    }

    /// Sets `debug_mode`. Returns `true` if it changed.
    pub fn set_debug_mode(&mut self, value: bool) -> bool {
        self.debug_mode.set(value)
    }

    pub fn toggle_debug_mode(&mut self) -> bool {
        self.debug_mode.update(|v| !v)
    }

    /// Calls `callback` with the new orientation whenever it changes.
    pub fn on_orientation_change(
        &mut self,
        callback: impl FnMut(OrientationMode) + 'static,
    ) -> Subscription {
        self.force_landscape
            .subscribe_mapped(OrientationMode::from_force_landscape, callback)
    }

    /// Calls `callback` whenever debug mode flips.
    pub fn on_debug_mode_change(&mut self, mut callback: impl FnMut(bool) + 'static) -> Subscription {
        self.debug_mode.subscribe(move |v| callback(*v))
    }

    /// Drops an orientation subscription.
    pub fn unsubscribe_orientation(&mut self, subscription: Subscription) -> bool {
        self.force_landscape.unsubscribe(subscription)
    }

    /// Drops a debug mode subscription.
    pub fn unsubscribe_debug_mode(&mut self, subscription: Subscription) -> bool {
        self.debug_mode.unsubscribe(subscription)
    }
}
