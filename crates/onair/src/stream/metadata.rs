//! Track metadata types and ICY frame parsing
//!
//! Pure data types and parsing functions for ICY (Icecast/Shoutcast) metadata.

use serde::{Deserialize, Serialize};

use crate::config::icy::{ARTIST_TITLE_SEPARATOR, FIELD_TERMINATOR, STREAM_TITLE_PREFIX};

/// The track currently on air
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub artist: String,
    pub title: String,
}

impl TrackInfo {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Create a track from a raw `StreamTitle` value.
    ///
    /// Splits on the first ` - ` separator: "Artist - Title" → artist="Artist", title="Title".
    /// If no separator is found, the whole (trimmed) value becomes the title and
    /// `default_artist` fills in the artist.
    pub fn from_stream_title(raw: &str, default_artist: &str) -> Self {
        match raw.split_once(ARTIST_TITLE_SEPARATOR) {
            Some((artist, title)) => Self::new(artist.trim(), title.trim()),
            None => Self::new(default_artist, raw.trim()),
        }
    }

    /// Both artist and title carry text
    pub fn is_complete(&self) -> bool {
        !self.artist.trim().is_empty() && !self.title.trim().is_empty()
    }
}

/// Extract the `StreamTitle` value from a decoded metadata frame.
///
/// ICY metadata format: `StreamTitle='Artist - Song';StreamUrl='...';`
///
/// The value ends at the first `';`; encoders that drop the terminator on the
/// last field get the rest of the frame.
pub fn parse_stream_title(metadata: &str) -> Option<&str> {
    let start = metadata.find(STREAM_TITLE_PREFIX)? + STREAM_TITLE_PREFIX.len();
    let rest = &metadata[start..];
    let end = rest.find(FIELD_TERMINATOR).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Decode a raw metadata frame (with NUL padding) to text.
///
/// Frames are NUL-padded to a multiple of 16 bytes. Padding is stripped and
/// invalid UTF-8 sequences are dropped rather than failing the frame.
pub fn decode_metadata_block(raw_block: &[u8]) -> String {
    let end = raw_block
        .iter()
        .rposition(|&b| b != 0)
        .map(|p| p + 1)
        .unwrap_or(0);

    let mut text = String::with_capacity(end);
    for chunk in raw_block[..end].utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
