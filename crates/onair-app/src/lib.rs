//! onair app services
//!
//! Now-playing sources, play history, configuration and HTTP handlers.
//! Depends on the `onair` engine crate.

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod network;
pub mod providers;
