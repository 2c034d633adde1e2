//! Screen layout and the status bar.
//!
//! Pure layout arithmetic; no application state is mutated here. Called
//! inside `terminal.draw()` so every frame reflects the live terminal size.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};
use reelfeed_core::{FeedPhase, OrientationMode, PaneSize};

use crate::app::AppState;
use crate::theme::Theme;

/// Returns `[feed, status_bar]` for the current frame.
///
/// The feed fills everything above a 1-row status bar. The rects are only
/// valid for the current draw closure.
pub fn compute_layout(frame: &Frame) -> [Rect; 2] {
    frame
        .area()
        .layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]))
}

/// Inner `Rect` of a bordered block.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered block; `Thick` when `is_active`.
pub fn panel_block<'a>(title: &'a str, is_active: bool, theme: &Theme) -> Block<'a> {
    let (border_style, border_type) = if is_active {
        (Style::default().fg(theme.border_active), BorderType::Thick)
    } else {
        (Style::default().fg(theme.border_inactive), BorderType::Plain)
    };
    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
}

/// Shape of the screen area, not the feed's layout axis.
///
/// Terminal cells are about twice as tall as they are wide, so a pane counts
/// as landscape once its width reaches twice its height.
pub fn screen_orientation(pane: PaneSize) -> &'static str {
    if u32::from(pane.width) >= 2 * u32::from(pane.height) {
        "landscape"
    } else {
        "portrait"
    }
}

/// Status line text: orientation, then position and, in debug mode, engine
/// state.
pub fn status_spans(state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    let feed = &state.feed;
    let orientation = match feed.orientation() {
        OrientationMode::Portrait => " PORTRAIT ",
        OrientationMode::ForcedLandscape => " LANDSCAPE ",
    };
    let position = if feed.item_count() == 0 {
        " no media ".to_owned()
    } else {
        format!(" {}/{} ", feed.published_index() + 1, feed.item_count())
    };

    let mut spans = vec![
        Span::styled(
            orientation,
            Style::default()
                .fg(theme.status_orientation)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(position),
    ];

    if state.settings.debug_mode() {
        let scrolling = if feed.is_actively_scrolling() {
            "Scrolling"
        } else {
            "Not Scrolling"
        };
        let snap = match feed.snap_enabled() {
            Some(true) => "snap on",
            Some(false) => "snap off",
            None => "detached",
        };
        let phase = match feed.phase() {
            FeedPhase::Idle => "idle",
            FeedPhase::ProgrammaticScroll => "programmatic",
        };
        let mut debug = format!(
            "| {scrolling} | media loaded: {} | {snap} | {phase}",
            state.entries.len()
        );
        if feed.is_frozen() {
            debug.push_str(" | frozen");
        }
        if state.is_loading() {
            debug.push_str(" | loading");
        }
        if state.settings.only_show_matching_orientation() {
            debug.push_str(&format!(
                " | limiting to {} orientation",
                screen_orientation(state.feed_pane)
            ));
        }
        spans.push(Span::styled(debug, Style::default().fg(theme.status_debug)));
    }
    spans
}

/// Renders the 1-row status bar at the bottom of the terminal.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(status_spans(state, theme)))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_orientation_accounts_for_cell_shape() {
        assert_eq!(screen_orientation(PaneSize::new(80, 24)), "landscape");
        assert_eq!(screen_orientation(PaneSize::new(60, 40)), "portrait");
        assert_eq!(screen_orientation(PaneSize::new(0, 0)), "landscape");
    }
}
