//! ICY stream source
//!
//! Reads the current track from a stream's inline metadata, resolving a
//! playlist URL to the stream first.

use onair::stream::{resolve_playlist_url, IcyMetadataReader, TrackInfo};
use std::time::Duration;

use crate::error::Result;

use super::traits::NowPlayingSource;

pub struct IcyStreamSource {
    url: String,
    reader: IcyMetadataReader,
}

impl IcyStreamSource {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        default_artist: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            reader: IcyMetadataReader::new(timeout, default_artist)?,
        })
    }
}

impl NowPlayingSource for IcyStreamSource {
    fn id(&self) -> &'static str {
        "icy"
    }

    fn location(&self) -> &str {
        &self.url
    }

    fn current_track(&self) -> Result<TrackInfo> {
        let stream_url = resolve_playlist_url(self.reader.client(), &self.url)?;
        Ok(self.reader.fetch_current_track(&stream_url)?)
    }
}
