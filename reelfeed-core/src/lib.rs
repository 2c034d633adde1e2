//! reelfeed-core: the feed synchronization engine and its media catalog.
//!
//! The engine keeps three things in agreement for a vertically or horizontally
//! paged media feed: the scroll offset of the active scroll surface, the set
//! of mounted items, and the authoritative current index. Everything is driven
//! by explicit `Instant`s so it runs the same under a real event loop and in
//! tests.
//!
//! Entry point: [`controller::FeedController`].

pub mod catalog;
pub mod controller;
pub mod error;
pub mod freeze;
pub mod index;
pub mod observer;
pub mod schema;
pub mod scroll;
pub mod settings;
pub mod signal;
pub mod store;
pub mod surface;
pub mod timer;
pub mod types;
pub mod visibility;
pub mod window;

pub use controller::{FeedConfig, FeedController, FeedEffect, FeedPhase, ItemProps};
pub use error::CatalogError;
pub use index::{clamp_index, Target};
pub use surface::ScrollBehavior;
pub use window::{OrientationMode, PaneSize};
