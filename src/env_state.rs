//! # Tracker environment state
//!
//! This module defines [`crate::env_state::TrackerEnv`], the **shared environment object** handed
//! to the element sources. It provides:
//!
//! - A persistent blocking **HTTP client** with a global timeout.
//! - The **base URL** of the GP element service (Celestrak by default).
//!
//! ## Structure
//!
//! ```text
//! TrackerEnv
//! ├── http_client  (reqwest::blocking::Client)
//! └── gp_base_url  (String)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rangerate::env_state::TrackerEnv;
//!
//! let env = TrackerEnv::new().unwrap();
//! let body = env.get_from_url(&env.gp_url(25544)).unwrap();
//! println!("{}", &body[..100.min(body.len())]);
//! ```
//!
//! ## Notes
//!
//! - The environment is cheap to clone; the underlying client shares its connection pool.
//! - No retry is attempted: a failed request is reported to the caller as is.
use std::time::Duration;

use reqwest::blocking::Client;

use crate::constants::CatalogNumber;
use crate::tracker_errors::TrackerError;

/// Default GP query endpoint.
pub const CELESTRAK_GP_URL: &str = "https://celestrak.org/NORAD/elements/gp.php";

/// This object is passed to the element sources that need network access.
///
/// # Fields
///
/// * `http_client` - A blocking reqwest client with a 10 s global timeout
/// * `gp_base_url` - Base URL of the GP element service
#[derive(Debug, Clone)]
pub struct TrackerEnv {
    pub http_client: Client,
    pub gp_base_url: String,
}

impl TrackerEnv {
    /// Create a new environment pointing at the Celestrak GP service.
    ///
    /// Return
    /// ------
    /// * A new environment, or a [`TrackerError::ReqwestError`] if the TLS backend cannot be
    ///   initialised.
    pub fn new() -> Result<Self, TrackerError> {
        TrackerEnv::with_base_url(CELESTRAK_GP_URL)
    }

    /// Create a new environment pointing at another GP-compatible service.
    pub fn with_base_url(base_url: &str) -> Result<Self, TrackerError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("rangerate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(TrackerEnv {
            http_client,
            gp_base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL returning the current element set of one catalog number in TLE format.
    pub fn gp_url(&self, catalog: CatalogNumber) -> String {
        format!("{}?CATNR={catalog}&FORMAT=TLE", self.gp_base_url)
    }

    /// GET a URL and return the body as text. Non-2xx statuses are errors.
    pub fn get_from_url(&self, url: &str) -> Result<String, TrackerError> {
        log::debug!("GET {url}");
        let body = self
            .http_client
            .get(url)
            .send()?
            .error_for_status()?
            .text()?;
        Ok(body)
    }
}

#[cfg(test)]
mod env_state_test {
    use super::*;

    #[test]
    fn test_gp_url() {
        let env = TrackerEnv::new().unwrap();
        assert_eq!(
            env.gp_url(25445),
            "https://celestrak.org/NORAD/elements/gp.php?CATNR=25445&FORMAT=TLE"
        );
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let env = TrackerEnv::with_base_url("http://localhost:8080/gp/").unwrap();
        assert_eq!(
            env.gp_url(7),
            "http://localhost:8080/gp?CATNR=7&FORMAT=TLE"
        );
    }
}
