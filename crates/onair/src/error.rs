//! Error types for onair
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for the onair engine
#[derive(Error, Debug)]
pub enum OnAirError {
    #[error("{}", friendly_network_error(.0))]
    Network(#[from] reqwest::Error),

    #[error("Server responded with HTTP {0}")]
    Status(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stream does not provide ICY metadata")]
    NoMetadataSupport,

    #[error("Stream ended early: expected {expected} bytes, received {received}")]
    TruncatedStream { expected: usize, received: usize },

    #[error("Metadata frame is empty")]
    EmptyMetadataFrame,

    #[error("Metadata frame has no StreamTitle field")]
    NoStreamTitleField,

    #[error("Playlist error: {0}")]
    Playlist(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Coarse failure class, used by callers to pick a default track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ConnectionFailure,
    NoMetadataSupport,
    TruncatedStream,
    EmptyMetadataFrame,
    NoStreamTitleField,
    Playlist,
    Decode,
}

impl OnAirError {
    pub fn kind(&self) -> FailureKind {
        match self {
            OnAirError::Network(_) | OnAirError::Status(_) | OnAirError::Io(_) => {
                FailureKind::ConnectionFailure
            }
            OnAirError::NoMetadataSupport => FailureKind::NoMetadataSupport,
            OnAirError::TruncatedStream { .. } => FailureKind::TruncatedStream,
            OnAirError::EmptyMetadataFrame => FailureKind::EmptyMetadataFrame,
            OnAirError::NoStreamTitleField => FailureKind::NoStreamTitleField,
            OnAirError::Playlist(_) => FailureKind::Playlist,
            OnAirError::Decode(_) => FailureKind::Decode,
        }
    }
}

/// Result type alias for onair
pub type Result<T> = std::result::Result<T, OnAirError>;

fn friendly_network_error(e: &reqwest::Error) -> String {
    if e.is_builder() {
        if let Some(url) = e.url() {
            return format!("Invalid URL: {url}");
        }
        return "Invalid URL".to_string();
    }
    if e.is_connect() {
        if let Some(url) = e.url() {
            return format!("Could not connect to {}", url.host_str().unwrap_or("server"));
        }
        return "Could not connect to server".to_string();
    }
    if e.is_timeout() {
        return "Connection timed out".to_string();
    }
    if e.is_decode() {
        return "Invalid response from server".to_string();
    }
    format!("Network error: {e}")
}
