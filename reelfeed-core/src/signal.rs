//! Explicit subscriptions and derived values.
//!
//! [`Signal`] is a value cell that notifies subscribers when it changes.
//! Subscribers get a [`Subscription`] handle back and are expected to hand it to
//! `unsubscribe` when they are torn down; nothing is collected implicitly.
//! [`Mapped`] is a read-only view over a signal that applies a pure mapping on
//! every read.

use std::fmt;

/// Handle returned by `subscribe`; pass it back to `unsubscribe`.
#[must_use = "dropping a Subscription leaks the callback until the source is cleared"]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// An ordered list of callbacks.
pub struct Subscribers<T> {
    next_id: u64,
    callbacks: Vec<(u64, Callback<T>)>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.callbacks.len())
            .finish()
    }
}

impl<T> Subscribers<T> {
    /// Registers `callback` and returns its handle.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        Subscription(id)
    }

    /// Removes the callback registered under `subscription`.
    ///
    /// Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(id, _)| *id != subscription.0);
        self.callbacks.len() != before
    }

    /// Calls every callback with `value`, in subscription order.
    pub fn notify(&mut self, value: &T) {
        for (_, callback) in &mut self.callbacks {
            callback(value);
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Returns `true` when nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Drops every callback.
    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}

/// A value that notifies its subscribers whenever it changes.
#[derive(Debug, Default)]
pub struct Signal<T> {
    value: T,
    subscribers: Subscribers<T>,
}

impl<T: PartialEq> Signal<T> {
    /// Creates a signal holding `value` with no subscribers.
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Subscribers::default(),
        }
    }

    /// Current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and notifies subscribers if it differs from the current one.
    ///
    /// Returns `true` when the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.subscribers.notify(&self.value);
        true
    }

    /// Applies `f` to a copy of the value and stores the result.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) -> bool {
        let next = f(&self.value);
        self.set(next)
    }

    /// Subscribes to changes.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> Subscription {
        self.subscribers.subscribe(callback)
    }

    /// Subscribes to changes, delivering `map(value)` instead of the raw value.
    pub fn subscribe_mapped<U>(
        &mut self,
        map: fn(&T) -> U,
        mut callback: impl FnMut(U) + 'static,
    ) -> Subscription
    where
        T: 'static,
        U: 'static,
    {
        self.subscribers.subscribe(move |value| callback(map(value)))
    }

    /// Removes a subscription created on this signal.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.subscribers.unsubscribe(subscription)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// A read-only view that maps the value through `map` on every read.
    pub fn map<U>(&self, map: fn(&T) -> U) -> Mapped<'_, T, U> {
        Mapped { source: self, map }
    }
}

/// A derived read-only value: a source signal plus a pure mapping.
///
/// Nothing is cached; `get` re-evaluates the mapping each time.
pub struct Mapped<'a, T, U> {
    source: &'a Signal<T>,
    map: fn(&T) -> U,
}

impl<T, U> Mapped<'_, T, U> {
    /// The mapped current value.
    pub fn get(&self) -> U {
        (self.map)(&self.source.value)
    }
}

impl<T: fmt::Debug, U: fmt::Debug> fmt::Debug for Mapped<'_, T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapped")
            .field("source", &self.source.value)
            .field("value", &self.get())
            .finish()
    }
}
