//! onair: now-playing metadata from internet radio streams
//!
//! Reads the ICY (Icecast/Shoutcast) inline metadata of a live stream and
//! turns its `StreamTitle` into an artist/title pair.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::time::Duration;
//! use onair::stream::IcyMetadataReader;
//!
//! let reader = IcyMetadataReader::new(Duration::from_secs(5), "My Station")?;
//! let track = reader.fetch_current_track("https://example.com/stream")?;
//! println!("{} - {}", track.artist, track.title);
//! # Ok::<(), onair::error::OnAirError>(())
//! ```

pub mod config;
pub mod error;
pub mod stream;
