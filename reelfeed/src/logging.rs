//! File logging.
//!
//! The terminal belongs to the TUI, so logs go to `.reelfeed/reelfeed.log`.
//! The level filter sits behind a reload layer so debug mode can raise it at
//! runtime. `RUST_LOG`, when set, always wins.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Handle for changing the log level after startup.
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

fn level(enabled: bool) -> &'static str {
    if enabled {
        "debug"
    } else {
        "info"
    }
}

impl LogHandle {
    /// Switches between `debug` and `info`. No-op when `RUST_LOG` is set.
    pub fn set_debug(&self, enabled: bool) {
        if self.from_env {
            return;
        }
        let level = level(enabled);
        match self.filter.reload(EnvFilter::new(level)) {
            Ok(()) => tracing::info!(level, "log level changed"),
            Err(e) => tracing::warn!(error = %e, "cannot change log level"),
        }
    }
}

/// Installs the global subscriber writing to `<dir>/reelfeed.log`.
///
/// # Errors
///
/// Returns `Err` if the log file cannot be opened or a global subscriber is
/// already installed.
pub fn init(dir: &Path, enabled: bool) -> std::io::Result<LogHandle> {
    std::fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("reelfeed.log"))?;

    let from_env = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    let filter = if from_env {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level(enabled))
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()
        .map_err(std::io::Error::other)?;

    Ok(LogHandle {
        filter: handle,
        from_env,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(from_env: bool) -> (reload::Layer<EnvFilter, Registry>, LogHandle) {
        let (layer, filter) = reload::Layer::new(EnvFilter::new("info"));
        (layer, LogHandle { filter, from_env })
    }

    fn current(log: &LogHandle) -> String {
        log.filter.with_current(|f| f.to_string()).unwrap()
    }

    #[test]
    fn debug_mode_switches_the_level() {
        let (_layer, log) = handle(false);
        log.set_debug(true);
        assert_eq!(current(&log), "debug");
        log.set_debug(false);
        assert_eq!(current(&log), "info");
    }

    #[test]
    fn rust_log_is_left_alone() {
        let (_layer, log) = handle(true);
        log.set_debug(true);
        assert_eq!(current(&log), "info");
    }
}
