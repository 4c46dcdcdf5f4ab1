//! Network operations
//!
//! HTTP client shared by the JSON sources.

pub mod client;

pub use client::HttpClient;
