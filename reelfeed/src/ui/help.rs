//! Help overlay.
//!
//! Draws a centred modal over the feed. `Clear` erases the background inside
//! the same `terminal.draw()` closure, so no second draw call is needed.

use ratatui::{
    Frame,
    layout::Constraint,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay, scrolled down by `help_scroll` rows.
///
/// Skipped on terminals narrower than 40 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(70));
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help: j/k scroll, ? or Esc to close ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Feed"),
        Line::from("  j / Down      Next item (Right in landscape)"),
        Line::from("  k / Up        Previous item (Left in landscape)"),
        Line::from("  g / G         Smooth scroll to first / last loaded item"),
        Line::from("  wheel         Scroll freely; the feed snaps to the nearest item"),
        Line::from(""),
        Line::from("Settings"),
        Line::from("  o             Toggle forced landscape"),
        Line::from("  D             Toggle debug mode"),
        Line::from("  m             Toggle limiting media to the screen orientation"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Show / hide this help"),
        Line::from("  q / Esc       Quit"),
    ])
}
