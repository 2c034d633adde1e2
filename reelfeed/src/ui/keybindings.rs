//! Keybinding dispatcher for reelfeed.
//!
//! Translates crossterm key and mouse events into feed operations and returns
//! a `KeyAction` telling the event loop whether to continue or quit. Branches
//! first on `state.mode` so the help overlay has its own handler.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use reelfeed_core::{OrientationMode, ScrollBehavior, Target};

use crate::app::{AppState, Mode};

/// Cells scrolled per mouse wheel notch.
pub const WHEEL_STEP: i64 = 3;

/// Control-flow signal returned from the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Keep running.
    Continue,
    /// Exit cleanly.
    Quit,
}

/// Feed navigation a key maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Previous,
}

/// Maps arrow keys onto navigation for the active orientation.
///
/// Portrait feeds page with Down/Up, landscape feeds with Right/Left. `j`/`k`
/// work in both.
pub fn navigation_for(code: KeyCode, orientation: OrientationMode) -> Option<Navigation> {
    match (code, orientation) {
        (KeyCode::Char('j'), _) => Some(Navigation::Next),
        (KeyCode::Char('k'), _) => Some(Navigation::Previous),
        (KeyCode::Down, OrientationMode::Portrait) => Some(Navigation::Next),
        (KeyCode::Up, OrientationMode::Portrait) => Some(Navigation::Previous),
        (KeyCode::Right, OrientationMode::ForcedLandscape) => Some(Navigation::Next),
        (KeyCode::Left, OrientationMode::ForcedLandscape) => Some(Navigation::Previous),
        _ => None,
    }
}

/// Dispatches a key event to the handler for the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState, now: Instant) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state, now),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState, now: Instant) -> KeyAction {
    if let Some(navigation) = navigation_for(key.code, state.feed.orientation()) {
        match navigation {
            Navigation::Next => state.feed.next(now),
            Navigation::Previous => state.feed.previous(now),
        }
        state.tick(now);
        return KeyAction::Continue;
    }

    match key.code {
        KeyCode::Char('g') => {
            state.feed.change_item(Target::Absolute(0), ScrollBehavior::Smooth, now);
            state.tick(now);
            KeyAction::Continue
        }
        KeyCode::Char('G') => {
            let last = state.feed.item_count().saturating_sub(1);
            state.feed.change_item(Target::from(last), ScrollBehavior::Smooth, now);
            state.tick(now);
            KeyAction::Continue
        }
        KeyCode::Char('o') => {
            state.toggle_landscape(now);
            KeyAction::Continue
        }
        KeyCode::Char('D') => {
            state.toggle_debug();
            KeyAction::Continue
        }
        KeyCode::Char('m') => {
            state.toggle_matching_orientation();
            KeyAction::Continue
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// `j`/`k` scroll the overlay; `?`, `Esc` or `q` dismiss it.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
            KeyAction::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
            KeyAction::Continue
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Mouse wheel scrolls the active surface like native scrolling.
///
/// Vertical wheel events drive portrait feeds; horizontal wheel events (and
/// vertical ones, for mice without a tilt wheel) drive landscape feeds.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState, now: Instant) -> KeyAction {
    if state.mode == Mode::HelpOverlay {
        match mouse.kind {
            MouseEventKind::ScrollUp => state.help_scroll = state.help_scroll.saturating_sub(3),
            MouseEventKind::ScrollDown => state.help_scroll = state.help_scroll.saturating_add(3),
            _ => {}
        }
        return KeyAction::Continue;
    }

    let delta = match mouse.kind {
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => WHEEL_STEP,
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => -WHEEL_STEP,
        _ => return KeyAction::Continue,
    };
    state.feed.wheel(delta, now);
    state.tick(now);
    KeyAction::Continue
}
