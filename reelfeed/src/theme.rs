//! Color theme system for reelfeed.
//!
//! A `Theme` holds named `ratatui::style::Color` fields for every surface the
//! feed renders. Two built-in themes are provided:
//!
//! - `dark`: ANSI 16 colors, works on any terminal.
//! - `catppuccin_mocha`: Catppuccin Mocha palette in RGB; needs truecolor.

use ratatui::style::Color;

/// All color values used across reelfeed's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Borders
    /// Feed pane border, and the current item's card border.
    pub border_active: Color,
    /// Border of the other mounted item cards.
    pub border_inactive: Color,

    // Item cards
    /// Media title.
    pub item_title: Color,
    /// Path, size and position lines.
    pub item_meta: Color,
    /// Badge shown on the playing item.
    pub badge_playing: Color,
    /// Badge shown on items that are mounted but paused.
    pub badge_paused: Color,
    /// Badge shown while the feed is scrolling.
    pub badge_scrolling: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground.
    pub status_bar_fg: Color,
    /// Orientation indicator.
    pub status_orientation: Color,
    /// Debug stats.
    pub status_debug: Color,

    // General
    /// Application background.
    pub background: Color,
}

impl Theme {
    /// The built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            item_title: Color::White,
            item_meta: Color::Gray,
            badge_playing: Color::Green,
            badge_paused: Color::DarkGray,
            badge_scrolling: Color::Yellow,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_orientation: Color::Cyan,
            status_debug: Color::Magenta,

            background: Color::Reset,
        }
    }

    /// The Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let mauve = Color::Rgb(203, 166, 247);    // #cba6f7
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let subtext0 = Color::Rgb(166, 173, 200); // #a6adc8
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let base = Color::Rgb(30, 30, 46);        // #1e1e2e
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            item_title: text,
            item_meta: subtext0,
            badge_playing: green,
            badge_paused: overlay1,
            badge_scrolling: yellow,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_orientation: lavender,
            status_debug: mauve,

            background: base,
        }
    }

    /// Resolves a theme name from config. Unknown names fall back to `dark`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
