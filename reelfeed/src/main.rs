//! reelfeed: a terminal media feed.
//!
//! Pages through a media catalog one item at a time, in portrait (vertical)
//! or forced-landscape (horizontal) orientation. The feed engine lives in
//! `reelfeed-core`; this binary wires it to the terminal, the catalog loader
//! and the user's settings.
//!
//! # Startup sequence
//!
//! 1. File logging, then config; both before the terminal is touched.
//! 2. `install_panic_hook()` so a panic restores the terminal.
//! 3. `register_sigterm()`; a watch task turns it into `AppEvent::Quit`.
//! 4. `init_tui()` and the event task.
//! 5. Open the catalog, import the library directory if one was given, and
//!    start the loader thread. The feed attaches on the first frame and asks
//!    for its first page from there.
//!
//! The loop exits only via `break`, so `restore_tui()` always runs after it.

mod app;
mod config;
mod event;
mod loader;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::Path;
use std::time::Instant;

use reelfeed_core::catalog;
use reelfeed_core::settings::SettingsStore;

use event::{AppEvent, SettingsChange};
use ui::keybindings::{handle_key, handle_mouse, KeyAction};

/// Sleeps until `deadline`, or forever when there is none.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending().await,
    }
}

/// Opens the catalog and imports `library` into it.
///
/// Import problems are logged and startup continues with what the catalog
/// already holds.
async fn prepare_catalog(path: &Path, library: Option<&Path>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = catalog::open_catalog(path)
        .await
        .map_err(std::io::Error::other)?;
    if let Some(dir) = library {
        if let Err(e) = catalog::import_directory(&conn, dir).await {
            tracing::warn!(dir = %dir.display(), error = %e, "library import failed");
        }
    }
    match catalog::count(&conn).await {
        Ok(total) => tracing::info!(total, "catalog ready"),
        Err(e) => tracing::warn!(error = %e, "cannot count catalog"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let log = logging::init(Path::new(".reelfeed"), false)?;
    let mut config = config::load();
    config.apply_args(std::env::args().skip(1));
    log.set_debug(config.debug_mode);
    tracing::info!(?config, "starting reelfeed");

    let theme = theme::Theme::from_name(&config.theme);
    let settings = SettingsStore::new(config.force_landscape, config.debug_mode)
        .with_only_show_matching_orientation(config.only_show_matching_orientation);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm();
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    event::spawn_sigterm_watch(handler.tx.clone(), term_flag);
    let mut rx = handler.rx;

    if let Err(e) = prepare_catalog(&config.catalog, config.library.as_deref()).await {
        let _ = tui::restore_tui();
        return Err(e);
    }
    let (loader_tx, loader_handle) = match loader::spawn_loader(config.catalog.clone(), handler.tx.clone()) {
        Ok(loader) => loader,
        Err(e) => {
            let _ = tui::restore_tui();
            return Err(e);
        }
    };

    let mut state = app::AppState::new(config.feed, settings, config.page_size, config.wrap)
        .with_loader(loader_tx);
    state.forward_settings(&handler.tx);

    let mut outcome = Ok(());
    'event_loop: loop {
        let deadline = state.feed.next_deadline();
        tokio::select! {
            _ = sleep_until(deadline) => {
                state.tick(Instant::now());
            }
            maybe_event = rx.recv() => {
                let now = Instant::now();
                match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme, now)) {
                            outcome = Err(e);
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Key(key)) => {
                        if handle_key(key, &mut state, now) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Mouse(mouse)) => {
                        handle_mouse(mouse, &mut state, now);
                    }
                    Some(AppEvent::MediaPage(page)) => {
                        state.apply_page(*page, now);
                    }
                    Some(AppEvent::SettingsChanged(SettingsChange::Orientation(_))) => {
                        state.sync_orientation(now);
                    }
                    Some(AppEvent::SettingsChanged(SettingsChange::DebugMode(enabled))) => {
                        log.set_debug(enabled);
                    }
                    // The next render re-measures the pane.
                    Some(AppEvent::Resize) | Some(AppEvent::Tick) => {}
                    Some(AppEvent::Quit) | None => break 'event_loop,
                }
                state.tick(now);
            }
        }
    }

    state.stop_forwarding_settings();
    state.feed.detach();
    // Dropping the request sender ends the loader loop.
    drop(state);
    if loader_handle.join().is_err() {
        tracing::warn!("loader thread panicked");
    }
    tracing::info!("reelfeed stopped");

    tui::restore_tui()?;
    outcome
}
