//! UI rendering for reelfeed.
//!
//! `render()` is the single entry point called from the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`, item
//! cards in `feed_view.rs`.

mod layout;
pub mod feed_view;
pub mod help;
pub mod keybindings;

use std::time::Instant;

use ratatui::Frame;
use reelfeed_core::PaneSize;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame.
///
/// The inner size of the feed pane is handed to the controller before any
/// card is drawn, so the first frame attaches the feed and a terminal resize
/// re-measures it in the same frame.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme, now: Instant) {
    let [feed_area, status_bar] = compute_layout(frame);

    let inner = inner_rect(feed_area);
    state.resize_feed(PaneSize::new(inner.width, inner.height), now);

    feed_view::render_feed(frame, feed_area, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
