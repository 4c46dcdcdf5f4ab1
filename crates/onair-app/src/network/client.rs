//! Shared HTTP client wrapper
//!
//! Thin wrapper around `reqwest::blocking::Client` that centralizes
//! USER_AGENT and timeout configuration.

use crate::error::Result;
use onair::config::network::USER_AGENT;
use onair::error::OnAirError;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Shared HTTP client with standard configuration
pub struct HttpClient {
    inner: reqwest::blocking::Client,
}

impl HttpClient {
    /// Create a client whose connect and reads are bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let inner = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self { inner })
    }

    /// GET a URL and deserialize the JSON response
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.inner.get(url).send()?;
        if !resp.status().is_success() {
            return Err(OnAirError::Status(resp.status().as_u16()).into());
        }
        let body = resp.text()?;
        serde_json::from_str(&body)
            .map_err(|e| OnAirError::Decode(format!("{url}: {e}")).into())
    }
}
