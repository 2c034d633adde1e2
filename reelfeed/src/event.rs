//! Event bus for reelfeed.
//!
//! Terminal input, timer ticks, loader results and settings changes are
//! normalised into one `AppEvent` enum and sent over a tokio unbounded MPSC
//! channel that the main loop drains.
//!
//! Two independent intervals drive rendering and housekeeping:
//! - **Render interval** (33 ms, about 30 FPS) triggers a `terminal.draw()`
//!   and keeps smooth-scroll animations sampled.
//! - **Tick interval** (250 ms) advances the feed when nothing else does.
//!
//! A separate watch task turns the SIGTERM flag into `AppEvent::Quit`.
//!
//! Engine deadlines (publishes, snap re-enable, freeze release) are not
//! driven from here; the main loop sleeps until the controller's next
//! deadline directly.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use reelfeed_core::OrientationMode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::loader::types::MediaPage;

/// A settings value that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    /// `force_landscape` flipped; carries the derived orientation.
    Orientation(OrientationMode),
    /// `debug_mode` flipped.
    DebugMode(bool),
}

/// All events the application can receive from any source.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A key press from the terminal (`KeyEventKind::Press` only).
    Key(KeyEvent),
    /// A mouse event from the terminal (click, wheel, move).
    Mouse(MouseEvent),
    /// Terminal was resized. The next render re-measures the feed pane from
    /// the frame, so no size is carried.
    Resize,
    /// Housekeeping tick (250 ms).
    Tick,
    /// Render tick: triggers a `terminal.draw()` call.
    Render,
    /// A page of media from the loader thread.
    MediaPage(Box<MediaPage>),
    /// A setting changed; published by the settings store subscriptions.
    SettingsChanged(SettingsChange),
    /// SIGTERM arrived.
    Quit,
}

/// Holds the sender and receiver ends of the unified event channel.
pub struct EventHandler {
    /// Send half; clone it for every producer.
    pub tx: mpsc::UnboundedSender<AppEvent>,
    /// Receive half, owned by the main loop.
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the background task that feeds terminal input and ticks into `tx`.
///
/// - `reader.next().fuse()` keeps `select!` from polling a finished stream.
/// - Only `KeyEventKind::Press` is forwarded; some platforms also report
///   releases, which would double every keystroke.
/// - Send errors are ignored; once the receiver is gone the task is moot.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            tokio::select! {
                _ = tick_tick => {
                    let _ = tx.send(AppEvent::Tick);
                }
                _ = render_tick => {
                    let _ = tx.send(AppEvent::Render);
                }
                maybe_event = crossterm_event => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            if key.kind == KeyEventKind::Press {
                                let _ = tx.send(AppEvent::Key(key));
                            }
                        }
                        Some(Ok(Event::Resize(..))) => {
                            let _ = tx.send(AppEvent::Resize);
                        }
                        Some(Ok(Event::Mouse(mouse))) => {
                            let _ = tx.send(AppEvent::Mouse(mouse));
                        }
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "terminal input error");
                        }
                        _ => {}
                    }
                }
            }
        }
    });
}

/// Spawns the task that turns the SIGTERM flag into `AppEvent::Quit`.
///
/// The flag is polled every 50 ms so a quiescent terminal still shuts down
/// promptly.
pub fn spawn_sigterm_watch(tx: mpsc::UnboundedSender<AppEvent>, term_flag: Arc<AtomicBool>) {
    tokio::spawn(async move {
        let mut heartbeat = interval(Duration::from_millis(50));
        loop {
            heartbeat.tick().await;
            if term_flag.load(Ordering::Relaxed) {
                tracing::info!("SIGTERM received");
                let _ = tx.send(AppEvent::Quit);
                break;
            }
            if tx.is_closed() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sigterm_flag_becomes_quit() {
        let handler = EventHandler::new();
        let mut rx = handler.rx;
        let flag = Arc::new(AtomicBool::new(false));
        spawn_sigterm_watch(handler.tx.clone(), Arc::clone(&flag));

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(rx.try_recv().is_err(), "nothing sent before the signal");

        flag.store(true, Ordering::Relaxed);
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert!(matches!(event, Some(AppEvent::Quit)));
    }
}
