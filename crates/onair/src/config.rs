//! Configuration constants for the onair engine

/// Network-related configuration
pub mod network {
    /// User agent for stream requests.
    ///
    /// Some stream servers refuse clients that do not look like a browser.
    pub const USER_AGENT: &str = concat!("Mozilla/5.0 (compatible; onair/", env!("CARGO_PKG_VERSION"), ")");

    /// Default request timeout in seconds (connect and every read)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

    /// Maximum playlist resolution depth
    pub const MAX_PLAYLIST_DEPTH: usize = 5;
}

/// ICY protocol constants
pub mod icy {
    /// Request header asking the server to interleave metadata
    pub const METADATA_REQUEST_HEADER: &str = "Icy-MetaData";

    /// Response header carrying the metadata interval
    pub const METAINT_HEADER: &str = "icy-metaint";

    /// The length byte counts blocks of this many bytes
    pub const BLOCK_UNIT: usize = 16;

    /// Key prefix of the title field inside a metadata frame
    pub const STREAM_TITLE_PREFIX: &str = "StreamTitle='";

    /// Terminator of a metadata field value
    pub const FIELD_TERMINATOR: &str = "';";

    /// Separator between artist and title in a StreamTitle value
    pub const ARTIST_TITLE_SEPARATOR: &str = " - ";
}
