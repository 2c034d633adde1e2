//! Terminal lifecycle.
//!
//! The TUI renders to stderr so stdout stays free for shell pipelines
//! (`reelfeed ~/clips | …`). Raw mode and the alternate screen must be undone
//! on every exit path, including panics.

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::{stderr, BufWriter, Stderr};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

/// Crossterm backend over a buffered stderr writer; buffering batches escape
/// sequences into fewer writes at the 30 FPS render rate.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stderr>>>;

/// Enables raw mode, enters the alternate screen and turns on mouse capture
/// so wheel events reach the feed. Pair with [`restore_tui`].
///
/// # Errors
///
/// Returns `Err` if the terminal cannot be put into raw mode or written to.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut out = BufWriter::new(stderr());
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Restores the terminal to its pre-TUI state. Idempotent; ratatui does not
/// restore on `Drop`, so every exit path calls this.
///
/// # Errors
///
/// Returns `Err` if the terminal cannot be switched back. The panic hook
/// ignores it.
pub fn restore_tui() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stderr(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Installs a panic hook that restores the terminal, then chains to the
/// previous hook so the panic message is readable. Call before [`init_tui`].
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

/// Returns a flag set when the process receives SIGTERM; the main loop polls
/// it on a heartbeat.
///
/// # Panics
///
/// Panics if the signal handler cannot be registered.
pub fn register_sigterm() -> Arc<AtomicBool> {
    let term = Arc::new(AtomicBool::new(false));
    register(SIGTERM, Arc::clone(&term)).expect("cannot register SIGTERM handler");
    term
}
