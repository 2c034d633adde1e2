//! Messages exchanged with the loader thread.
//!
//! Fully owned and `Send` so they can cross from the loader thread to the
//! main loop.

use reelfeed_core::types::MediaItem;

/// Requests sent to the loader thread over a `crossbeam_channel::Sender`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    /// Load up to `limit` items starting at catalog position `offset`.
    Page {
        offset: usize,
        limit: usize,
    },
}

/// A page of catalog items, carried inside `AppEvent::MediaPage`.
#[derive(Debug, Clone, Default)]
pub struct MediaPage {
    /// Catalog position of the first item; echoes the request.
    pub offset: usize,
    /// Items in feed order. Short or empty at the end of the catalog.
    pub items: Vec<MediaItem>,
    /// Catalog size when the page was read.
    pub total: usize,
    /// The query failed; `items` and `total` carry no information.
    pub failed: bool,
}
