//! Catalog loader.
//!
//! A background `std::thread` owns a blocking `rusqlite::Connection` to the
//! catalog for its lifetime and serves page requests, so queries never run on
//! the async event loop.
pub mod types;
pub mod worker;

use std::path::PathBuf;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::AppEvent;
use types::LoadRequest;

/// Starts the loader thread for the catalog at `path`.
///
/// Returns the request sender; dropping it stops the thread.
///
/// # Errors
///
/// Returns `Err` if the OS refuses to spawn the thread.
pub fn spawn_loader(
    path: PathBuf,
    event_tx: UnboundedSender<AppEvent>,
) -> std::io::Result<(Sender<LoadRequest>, JoinHandle<()>)> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let handle = std::thread::Builder::new()
        .name("reelfeed-loader".to_owned())
        .spawn(move || worker::loader_worker_loop(path, rx, event_tx))?;
    Ok((tx, handle))
}
