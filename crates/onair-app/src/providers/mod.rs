//! Now-playing sources
//!
//! Ways of finding the current track (ICY stream, JSON APIs) and the chain
//! that tries them in order.

pub mod icy_stream;
pub mod json_api;
pub mod traits;

// Re-exports
pub use icy_stream::IcyStreamSource;
pub use json_api::{RadioTApiSource, TrackEndpointSource};
pub use traits::NowPlayingSource;

use crate::config::{AppConfig, SourceConfig};
use crate::error::{AppError, Result};
use onair::stream::TrackInfo;
use tracing::{debug, warn};

/// Ordered list of sources, stopping at the first that answers
pub struct SourceChain {
    sources: Vec<Box<dyn NowPlayingSource>>,
}

impl SourceChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Build the chain described by `config.sources`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let station = &config.station;
        let mut chain = Self::new();
        for source in &config.sources {
            let boxed: Box<dyn NowPlayingSource> = match source {
                SourceConfig::Icy { url } => Box::new(IcyStreamSource::new(
                    url,
                    station.timeout(),
                    &station.label,
                )?),
                SourceConfig::RadioT { url } => Box::new(RadioTApiSource::new(
                    url,
                    station.timeout(),
                    &station.unknown_artist,
                )?),
                SourceConfig::TrackEndpoint { url } => Box::new(TrackEndpointSource::new(
                    url,
                    station.timeout(),
                    &station.unknown_artist,
                )?),
            };
            chain.push(boxed);
        }
        Ok(chain)
    }

    /// Append a source to the end of the chain
    pub fn push(&mut self, source: Box<dyn NowPlayingSource>) {
        self.sources.push(source);
    }

    /// Ask each source in turn; the first success wins.
    ///
    /// Returns the last error when every source fails.
    pub fn current_track(&self) -> Result<TrackInfo> {
        let mut last_error = None;
        for source in &self.sources {
            match source.current_track() {
                Ok(track) => {
                    debug!(source = source.id(), location = source.location(), "Current track found");
                    return Ok(track);
                }
                Err(e) => {
                    warn!(
                        source = source.id(),
                        location = source.location(),
                        error = %e,
                        "Now-playing source failed"
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| AppError::Config("No now-playing sources configured".to_string())))
    }

    /// List all source IDs, in order
    pub fn list_ids(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    /// Number of sources in the chain
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the chain has no sources
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceChain {
    fn default() -> Self {
        Self::new()
    }
}
