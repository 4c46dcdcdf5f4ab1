//! Now-playing source trait
//!
//! Defines the interface that every way of finding the current track implements.

use crate::error::Result;
use onair::stream::TrackInfo;

/// A place that can tell what is on air right now
pub trait NowPlayingSource: Send + Sync {
    /// Machine-readable identifier (e.g., "icy")
    fn id(&self) -> &'static str;

    /// Where the source reads from, for logging
    fn location(&self) -> &str;

    /// Fetch the current track
    fn current_track(&self) -> Result<TrackInfo>;
}
