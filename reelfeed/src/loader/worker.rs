//! Background thread that owns the blocking catalog connection.
//!
//! All communication is via channels: `LoadRequest` in, `AppEvent::MediaPage`
//! out.

use std::path::PathBuf;

use crossbeam_channel::Receiver;
use reelfeed_core::catalog;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::AppEvent;
use crate::loader::types::{LoadRequest, MediaPage};

/// Entry point for the loader thread.
///
/// Opens the catalog at `path` and serves requests until the request channel
/// closes. If the catalog cannot be opened the thread logs and exits; the feed
/// then simply stays empty.
pub fn loader_worker_loop(
    path: PathBuf,
    rx: Receiver<LoadRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    let db = match catalog::open_blocking(&path) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "loader cannot open catalog");
            return;
        }
    };

    for request in rx {
        let page = handle_request(&db, request);
        if event_tx.send(AppEvent::MediaPage(Box::new(page))).is_err() {
            break;
        }
    }
    tracing::debug!("loader thread exiting");
}

/// Serves one request. Query errors come back as a `failed` page.
pub fn handle_request(db: &rusqlite::Connection, request: LoadRequest) -> MediaPage {
    match request {
        LoadRequest::Page { offset, limit } => {
            let result = catalog::page(db, offset, limit)
                .and_then(|items| Ok((items, catalog::total(db)?)));
            match result {
                Ok((items, total)) => {
                    tracing::debug!(offset, limit, loaded = items.len(), total, "page loaded");
                    MediaPage { offset, items, total, failed: false }
                }
                Err(e) => {
                    tracing::warn!(offset, limit, error = %e, "page query failed");
                    MediaPage { offset, failed: true, ..MediaPage::default() }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelfeed_core::catalog::ScannedFile;

    fn catalog_with(n: usize) -> rusqlite::Connection {
        let mut db = rusqlite::Connection::open_in_memory().unwrap();
        catalog::configure(&mut db).unwrap();
        let files: Vec<_> = (0..n)
            .map(|i| ScannedFile {
                path: format!("/clips/{i:03}.mp4"),
                title: format!("clip {i}"),
                size_bytes: 1,
            })
            .collect();
        catalog::insert_files(&mut db, &files).unwrap();
        db
    }

    #[test]
    fn pages_echo_their_offset() {
        let db = catalog_with(12);
        let page = handle_request(&db, LoadRequest::Page { offset: 10, limit: 10 });
        assert_eq!(page.offset, 10);
        assert_eq!(page.total, 12);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "clip 10");
    }

    #[test]
    fn query_errors_are_flagged() {
        // No schema, so every query fails.
        let db = rusqlite::Connection::open_in_memory().unwrap();
        let page = handle_request(&db, LoadRequest::Page { offset: 20, limit: 10 });
        assert!(page.failed);
        assert_eq!(page.offset, 20);
        assert!(page.items.is_empty());
    }

    #[test]
    fn worker_replies_over_the_event_channel() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catalog.db");
        {
            let mut db = catalog::open_blocking(&path).unwrap();
            let files = [ScannedFile {
                path: "/clips/only.mp4".to_owned(),
                title: "only".to_owned(),
                size_bytes: 1,
            }];
            catalog::insert_files(&mut db, &files).unwrap();
        }

        let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
        let (tx, handle) = crate::loader::spawn_loader(path, event_tx).unwrap();
        tx.send(LoadRequest::Page { offset: 0, limit: 5 }).unwrap();
        drop(tx);
        handle.join().unwrap();

        match event_rx.try_recv().unwrap() {
            AppEvent::MediaPage(page) => {
                assert_eq!(page.items.len(), 1);
                assert_eq!(page.total, 1);
                assert!(!page.failed);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
