//! JSON now-playing APIs
//!
//! Sources that ask an HTTP API instead of reading the stream.

use crate::error::Result;
use crate::network::HttpClient;
use onair::error::OnAirError;
use onair::stream::TrackInfo;
use serde::Deserialize;
use std::time::Duration;

use super::traits::NowPlayingSource;

// =============================================================================
// Internal API response types (serde)
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct RtInfo {
    #[serde(default)]
    song: Option<RtSong>,
}

#[derive(Debug, Default, Deserialize)]
struct RtSong {
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PlainTrack {
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// Build a track, rejecting answers that name no title
fn track_or_missing(
    artist: Option<String>,
    title: Option<String>,
    unknown_artist: &str,
) -> Result<TrackInfo> {
    let title = title.map(|t| t.trim().to_string()).unwrap_or_default();
    if title.is_empty() {
        return Err(OnAirError::NoStreamTitleField.into());
    }
    let artist = artist
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| unknown_artist.to_string());
    Ok(TrackInfo::new(artist, title))
}

// =============================================================================
// RadioTApiSource
// =============================================================================

/// API answering `{"song": {"artist": ..., "title": ...}}`
pub struct RadioTApiSource {
    client: HttpClient,
    url: String,
    unknown_artist: String,
}

impl RadioTApiSource {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        unknown_artist: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(timeout)?,
            url: url.into(),
            unknown_artist: unknown_artist.into(),
        })
    }

    fn to_track(&self, info: RtInfo) -> Result<TrackInfo> {
        let song = info.song.unwrap_or_default();
        track_or_missing(song.artist, song.title, &self.unknown_artist)
    }
}

impl NowPlayingSource for RadioTApiSource {
    fn id(&self) -> &'static str {
        "radio-t"
    }

    fn location(&self) -> &str {
        &self.url
    }

    fn current_track(&self) -> Result<TrackInfo> {
        let info: RtInfo = self.client.get_json(&self.url)?;
        self.to_track(info)
    }
}

// =============================================================================
// TrackEndpointSource
// =============================================================================

/// Endpoint answering `{"artist": ..., "title": ...}`, such as another onair instance
pub struct TrackEndpointSource {
    client: HttpClient,
    url: String,
    unknown_artist: String,
}

impl TrackEndpointSource {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        unknown_artist: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(timeout)?,
            url: url.into(),
            unknown_artist: unknown_artist.into(),
        })
    }
}

impl NowPlayingSource for TrackEndpointSource {
    fn id(&self) -> &'static str {
        "track-endpoint"
    }

    fn location(&self) -> &str {
        &self.url
    }

    fn current_track(&self) -> Result<TrackInfo> {
        let track: PlainTrack = self.client.get_json(&self.url)?;
        track_or_missing(track.artist, track.title, &self.unknown_artist)
    }
}
