//! Feed pane renderer.
//!
//! Draws one card per index in the controller's render set. Cards are placed
//! along the active axis at `index * item_extent - scroll_offset`, so a
//! partially scrolled feed shows the edges of two cards at once. Anything
//! outside the pane is clipped.
//!
//! In debug mode every card gets its own background hue and the current card
//! a dashed border, so the mounted range and the current index are visible
//! while scrolling.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BorderType, Paragraph},
};
use reelfeed_core::window::Axis;
use reelfeed_core::ItemProps;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// What an item card shows in its badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Playing,
    Scrolling,
    Paused,
}

impl Badge {
    /// Media plays only on the current item, and only once scrolling stops.
    pub fn for_item(props: ItemProps) -> Self {
        if props.is_actively_scrolling {
            Badge::Scrolling
        } else if props.is_current {
            Badge::Playing
        } else {
            Badge::Paused
        }
    }

    fn label(self) -> &'static str {
        match self {
            Badge::Playing => "▶ playing",
            Badge::Scrolling => "… scrolling",
            Badge::Paused => "⏸ paused",
        }
    }
}

/// Background hue of a card in debug mode: 37 degrees apart per index at
/// 70% saturation and 50% lightness.
pub fn debug_tint(index: usize) -> Color {
    let hue = (index * 37 % 360) as f32;
    let (saturation, lightness) = (0.7_f32, 0.5_f32);
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f32| ((v + m) * 255.0).round() as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}

/// Places an item slot starting `start` cells along `axis` into `area`.
///
/// Returns `None` if no part of the slot is visible.
pub fn slot_rect(area: Rect, axis: Axis, start: i64, extent: u32) -> Option<Rect> {
    let (origin, length) = match axis {
        Axis::Vertical => (area.y, area.height),
        Axis::Horizontal => (area.x, area.width),
    };
    let end = start + i64::from(extent);
    let visible_start = start.max(0);
    let visible_end = end.min(i64::from(length));
    if visible_end <= visible_start {
        return None;
    }
    // Both bounds lie within [0, length], which fits in u16.
    let offset = u16::try_from(visible_start).ok()?;
    let size = u16::try_from(visible_end - visible_start).ok()?;
    Some(match axis {
        Axis::Vertical => Rect::new(area.x, origin + offset, area.width, size),
        Axis::Horizontal => Rect::new(origin + offset, area.y, size, area.height),
    })
}

/// Renders the feed block and every mounted item card.
pub fn render_feed(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let title = match state.current_entry() {
        Some(entry) => format!(" Feed: {} ", entry.item.title),
        None => " Feed ".to_owned(),
    };
    frame.render_widget(panel_block(&title, true, theme), area);

    let inner = inner_rect(area);
    let feed = &state.feed;
    if state.entries.is_empty() {
        let message = if state.is_loading() {
            "  loading media…"
        } else {
            "  no media in the catalog, start with --library <dir>"
        };
        frame.render_widget(
            Paragraph::new(Line::from(message)).style(Style::default().fg(theme.item_meta)),
            inner,
        );
        return;
    }

    let debug = state.settings.debug_mode();
    let axis = feed.orientation().axis();
    let extent = feed.item_extent();
    let offset = i64::try_from(feed.scroll_offset().unwrap_or(0)).unwrap_or(i64::MAX);

    for &index in feed.render_set() {
        let Some(entry) = state.entries.get(index) else {
            continue;
        };
        let start = i64::try_from(index)
            .unwrap_or(i64::MAX)
            .saturating_mul(i64::from(extent))
            .saturating_sub(offset);
        let Some(slot) = slot_rect(inner, axis, start, extent) else {
            continue;
        };

        let props = feed.item_props(index);
        let badge = Badge::for_item(props);
        let badge_color = match badge {
            Badge::Playing => theme.badge_playing,
            Badge::Scrolling => theme.badge_scrolling,
            Badge::Paused => theme.badge_paused,
        };

        let card_title = format!(" #{} ", index + 1);
        let mut block = panel_block(&card_title, props.is_current, theme);
        let mut card_style = Style::default();
        if debug {
            card_style = card_style.bg(debug_tint(index));
            if props.is_current {
                block = block
                    .border_type(BorderType::HeavyDoubleDashed)
                    .border_style(Style::default().fg(theme.status_debug));
            }
        }
        let body = vec![
            Line::from(Span::styled(
                entry.item.title.clone(),
                Style::default()
                    .fg(theme.item_title)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                entry.item.path.clone(),
                Style::default().fg(theme.item_meta),
            )),
            Line::from(Span::styled(
                format!("{} KiB", entry.item.size_bytes / 1024),
                Style::default().fg(theme.item_meta),
            )),
            Line::from(""),
            Line::from(Span::styled(badge.label(), Style::default().fg(badge_color))),
        ];
        frame.render_widget(Paragraph::new(body).block(block).style(card_style), slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_follows_current_and_scrolling() {
        let props = |is_current, is_actively_scrolling| ItemProps {
            index: 0,
            is_current,
            is_actively_scrolling,
        };
        assert_eq!(Badge::for_item(props(true, false)), Badge::Playing);
        assert_eq!(Badge::for_item(props(true, true)), Badge::Scrolling);
        assert_eq!(Badge::for_item(props(false, false)), Badge::Paused);
    }

    #[test]
    fn debug_tints_step_around_the_hue_wheel() {
        assert_eq!(debug_tint(0), Color::Rgb(217, 38, 38));
        // 120 * 37 and 240 * 37 land back on 120 and 240 degrees.
        assert_eq!(debug_tint(120), Color::Rgb(38, 217, 38));
        assert_eq!(debug_tint(240), Color::Rgb(38, 38, 217));
        assert_ne!(debug_tint(1), debug_tint(2));
        assert_eq!(debug_tint(10), debug_tint(10 + 360));
    }

    #[test]
    fn slots_clip_to_the_pane() {
        let area = Rect::new(1, 1, 30, 10);
        assert_eq!(
            slot_rect(area, Axis::Vertical, 0, 10),
            Some(Rect::new(1, 1, 30, 10))
        );
        // Half scrolled out at the top.
        assert_eq!(
            slot_rect(area, Axis::Vertical, -4, 10),
            Some(Rect::new(1, 1, 30, 6))
        );
        // Entering from the right.
        assert_eq!(
            slot_rect(area, Axis::Horizontal, 26, 30),
            Some(Rect::new(27, 1, 4, 10))
        );
        assert_eq!(slot_rect(area, Axis::Vertical, 10, 10), None);
        assert_eq!(slot_rect(area, Axis::Vertical, -10, 10), None);
    }
}
