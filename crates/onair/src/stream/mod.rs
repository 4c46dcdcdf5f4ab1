//! Stream handling
//!
//! Resolves playlist URLs, connects to ICY streams and reads the inline
//! metadata frame that names the current track.

pub mod icy;
pub mod metadata;
pub mod playlist;

pub use icy::{IcyConnection, IcyHeaders, IcyMetadataReader, IcyProbe};
pub use metadata::TrackInfo;
pub use playlist::resolve_playlist_url;
