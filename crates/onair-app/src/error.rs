//! Error types for onair app services
//!
//! Application-level errors that wrap engine errors and add app-specific variants.

use onair::error::{FailureKind, OnAirError};
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] OnAirError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Failure class of the underlying engine error, if any
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            AppError::Engine(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Engine(OnAirError::Network(e))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Engine(OnAirError::Io(e))
    }
}

/// Result type alias for onair app services
pub type Result<T> = std::result::Result<T, AppError>;
