//! User configuration.
//!
//! Read from `$XDG_CONFIG_HOME/reelfeed/config.toml` (falling back to
//! `~/.config/reelfeed/config.toml`). Every field has a default, so a missing
//! file, a missing key, or a broken file all still start the app; problems are
//! logged, never fatal.

use std::path::{Path, PathBuf};

use reelfeed_core::FeedConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything `config.toml` can set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Built-in theme name: `dark` or `catppuccin-mocha`.
    pub theme: String,
    /// Start in forced-landscape orientation.
    pub force_landscape: bool,
    /// Start with debug stats shown and debug logging on.
    pub debug_mode: bool,
    /// Limit media to the screen's orientation.
    pub only_show_matching_orientation: bool,
    /// Directory imported into the catalog at startup.
    pub library: Option<PathBuf>,
    /// SQLite catalog location.
    pub catalog: PathBuf,
    /// Items requested per load.
    pub page_size: usize,
    /// Start over from the first item once the catalog is exhausted.
    pub wrap: bool,
    /// Engine tunables.
    pub feed: FeedConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            force_landscape: false,
            debug_mode: false,
            only_show_matching_orientation: false,
            library: None,
            catalog: PathBuf::from(".reelfeed/catalog.db"),
            page_size: 10,
            wrap: true,
            feed: FeedConfig::default(),
        }
    }
}

impl Config {
    /// Applies command-line overrides.
    ///
    /// Accepts either `--library <dir>` or a bare directory as the first
    /// argument.
    pub fn apply_args(&mut self, mut args: impl Iterator<Item = String>) {
        match args.next().as_deref() {
            Some("--library") | Some("-l") => {
                if let Some(dir) = args.next() {
                    self.library = Some(PathBuf::from(dir));
                }
            }
            Some(dir) if !dir.starts_with('-') => self.library = Some(PathBuf::from(dir)),
            _ => {}
        }
    }
}

/// Returns the path to the reelfeed config file.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("reelfeed").join("config.toml")
}

/// Parses a config document.
pub fn parse(raw: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(raw)?)
}

/// Reads the config at `path`. A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => parse(&raw),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e.into()),
    }
}

/// Loads the user config, falling back to defaults on any error.
pub fn load() -> Config {
    let path = config_path();
    match load_from(&path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "config loaded");
            config
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring config");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn feed_table_overrides_only_named_fields() {
        let config = parse(
            r#"
            theme = "dark"
            force_landscape = true
            only_show_matching_orientation = true
            page_size = 25

            [feed]
            publish_throttle_ms = 250
            overscan = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.theme, "dark");
        assert!(config.force_landscape);
        assert!(config.only_show_matching_orientation);
        assert!(!config.debug_mode);
        assert_eq!(config.page_size, 25);
        assert!(config.wrap);
        assert_eq!(config.feed.publish_throttle_ms, 250);
        assert_eq!(config.feed.overscan, 2);
        assert_eq!(config.feed.snap_reenable_ms, 100);
    }

    #[test]
    fn bad_types_are_parse_errors() {
        assert!(matches!(parse("page_size = \"lots\""), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let config = load_from(Path::new("/definitely/not/here/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn library_from_args() {
        let mut config = Config::default();
        config.apply_args(["--library", "/media"].into_iter().map(String::from));
        assert_eq!(config.library, Some(PathBuf::from("/media")));

        let mut config = Config::default();
        config.apply_args(["clips"].into_iter().map(String::from));
        assert_eq!(config.library, Some(PathBuf::from("clips")));

        let mut config = Config::default();
        config.apply_args(["--verbose"].into_iter().map(String::from));
        assert_eq!(config.library, None);
    }
}
