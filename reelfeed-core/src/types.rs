//! Owned data types shared between the catalog, the loader and the UI.

use uuid::Uuid;

/// One media file known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub id: String,           // UUID v4 text
    pub path: String,
    pub title: String,
    pub size_bytes: i64,
    pub added_at: i64,        // Unix timestamp seconds
}

/// A media item placed in the feed.
///
/// The same media item can appear more than once when the feed wraps around,
/// so every placement gets its own key.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub key: Uuid,
    pub item: MediaItem,
}

impl FeedEntry {
    pub fn new(item: MediaItem) -> Self {
        Self {
            key: Uuid::new_v4(),
            item,
        }
    }
}
