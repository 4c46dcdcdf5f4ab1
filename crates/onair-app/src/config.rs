//! Configuration for onair app services
//!
//! Constants plus the `onair.toml` file model. Every field has a default, so
//! a missing file or section still yields a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use onair::config::network::DEFAULT_TIMEOUT_SECS;
use onair::error::FailureKind;
use onair::stream::TrackInfo;
use serde::{Deserialize, Serialize};

use crate::data::storage;
use crate::error::{AppError, Result};

/// Application metadata
pub mod app {
    /// Application name (used for config directory, etc.)
    pub const NAME: &str = "onair";

    /// Config file name
    pub const CONFIG_FILE: &str = "onair.toml";
}

/// History-related configuration
pub mod history {
    /// History data file name
    pub const HISTORY_FILE: &str = "history.json";

    /// Number of distinct tracks returned by default
    pub const DEFAULT_LIMIT: usize = 10;

    /// Oldest entries are dropped beyond this size
    pub const MAX_HISTORY_ENTRIES: usize = 1000;
}

/// Server-related configuration
pub mod server {
    pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
}

/// Labels and timeouts for the station being proxied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Artist shown when nothing better is known
    pub label: String,
    /// Title shown while the station is live but names no track
    pub on_air_title: String,
    /// Title shown when the stream cannot be reached
    pub idle_title: String,
    /// Artist used by JSON sources that omit one
    pub unknown_artist: String,
    pub timeout_secs: u64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            label: "КонтентМедиаPRO".to_string(),
            on_air_title: "В эфире".to_string(),
            idle_title: "Радио вещает".to_string(),
            unknown_artist: "Неизвестно".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl StationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn on_air(&self) -> TrackInfo {
        TrackInfo::new(&self.label, &self.on_air_title)
    }

    pub fn idle(&self) -> TrackInfo {
        TrackInfo::new(&self.label, &self.idle_title)
    }

    /// Default track to show in place of `err`.
    ///
    /// Unreachable streams read as "broadcasting"; a reachable stream that
    /// names no track reads as "on air".
    pub fn fallback_for(&self, err: &AppError) -> TrackInfo {
        match err.failure_kind() {
            Some(FailureKind::ConnectionFailure) | Some(FailureKind::Playlist) | None => {
                self.idle()
            }
            Some(_) => self.on_air(),
        }
    }
}

/// A now-playing source, tried in configuration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceConfig {
    /// ICY stream or a playlist pointing to one
    Icy { url: String },
    /// JSON API shaped `{"song": {"artist", "title"}}`
    RadioT { url: String },
    /// JSON endpoint shaped `{"artist", "title"}`
    TrackEndpoint { url: String },
}

impl SourceConfig {
    pub fn url(&self) -> &str {
        match self {
            SourceConfig::Icy { url }
            | SourceConfig::RadioT { url }
            | SourceConfig::TrackEndpoint { url } => url,
        }
    }
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::Icy {
            url: "https://myradio24.org/54137.m3u".to_string(),
        },
        SourceConfig::Icy {
            url: "https://myradio24.org/54137".to_string(),
        },
    ]
}

/// Play history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// History file; defaults to `<config dir>/onair/history.json`
    pub path: Option<PathBuf>,
    pub limit: usize,
    /// Shown while the history is empty or unreadable
    pub fallback_tracks: Vec<TrackInfo>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            limit: history::DEFAULT_LIMIT,
            fallback_tracks: vec![
                TrackInfo::new("Dua Lipa", "Houdini"),
                TrackInfo::new("The Weeknd", "Blinding Lights"),
                TrackInfo::new("Imagine Dragons", "Believer"),
                TrackInfo::new("Billie Eilish", "What Was I Made For?"),
                TrackInfo::new("Harry Styles", "As It Was"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: server::DEFAULT_LISTEN.to_string(),
        }
    }
}

/// Contents of `onair.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: Option<String>,
    pub station: StationConfig,
    pub sources: Vec<SourceConfig>,
    pub history: HistoryConfig,
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            station: StationConfig::default(),
            sources: default_sources(),
            history: HistoryConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Default search paths for `onair.toml`
/// (current directory → XDG config → /etc).
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(app::CONFIG_FILE)];
    if let Ok(dir) = storage::config_dir() {
        paths.push(dir.join(app::CONFIG_FILE));
    }
    paths.push(Path::new("/etc").join(app::NAME).join(app::CONFIG_FILE));
    paths
}

impl AppConfig {
    /// Parse a config file at a specific path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        Self::from_toml(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse {:?}: {}", path, e)))
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the first config file found on the default search paths.
    ///
    /// Returns the built-in defaults and `None` when no file exists.
    pub fn load_from_default_paths() -> Result<(Self, Option<PathBuf>)> {
        for path in config_search_paths() {
            if path.exists() {
                let config = Self::load_from_file(&path)?;
                return Ok((config, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    /// Load from `explicit` if given, otherwise search the default paths,
    /// then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let (mut config, path) = match explicit {
            Some(path) => (Self::load_from_file(path)?, Some(path.to_path_buf())),
            None => Self::load_from_default_paths()?,
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok((config, path))
    }

    /// Apply `ONAIR_*` overrides looked up through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("ONAIR_STREAM_URL").filter(|v| !v.trim().is_empty()) {
            self.sources.insert(0, SourceConfig::Icy { url });
        }
        if let Some(path) = lookup("ONAIR_HISTORY_PATH").filter(|v| !v.trim().is_empty()) {
            self.history.path = Some(PathBuf::from(path));
        }
        if let Some(listen) = lookup("ONAIR_LISTEN").filter(|v| !v.trim().is_empty()) {
            self.server.listen = listen;
        }
        if let Some(level) = lookup("ONAIR_LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
            self.log_level = Some(level);
        }
    }

    /// Where the play history lives
    pub fn history_path(&self) -> Result<PathBuf> {
        match &self.history.path {
            Some(path) => Ok(path.clone()),
            None => storage::data_path(history::HISTORY_FILE),
        }
    }

    /// URL of the first ICY source, used for diagnostics
    pub fn primary_stream_url(&self) -> Option<&str> {
        self.sources.iter().find_map(|s| match s {
            SourceConfig::Icy { url } => Some(url.as_str()),
            _ => None,
        })
    }
}
