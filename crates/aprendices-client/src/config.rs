//! Client configuration.
//!
//! The same client serves two deployments: a cross-origin API reached
//! through an absolute `base_url`, and a same-origin API where `base_url` is
//! empty and paths are resolved against the page `origin`.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Configuration for the dashboard client. Immutable once the client is built.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Prefix for every endpoint. Empty for same-origin deployments.
    #[serde(default)]
    pub base_url: String,

    /// Origin used to resolve relative addresses (e.g. `https://dash.example`).
    #[serde(default)]
    pub origin: Option<String>,

    /// Send `Content-Type: application/json` on every request by default.
    #[serde(default = "ClientConfig::default_json_content_type")]
    pub json_content_type: bool,

    /// Whole-request timeout in seconds.
    #[serde(default = "ClientConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Connection establishment timeout in seconds.
    #[serde(default = "ClientConfig::default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl ClientConfig {
    const fn default_json_content_type() -> bool {
        true
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    const fn default_connect_timeout() -> u64 {
        5
    }

    /// Configuration for an API served from another origin.
    #[must_use]
    pub fn cross_origin(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Configuration for an API served from the page's own origin.
    #[must_use]
    pub fn same_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
            ..Self::default()
        }
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Get the connect timeout as a `Duration`.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Build the target address for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url + endpoint` is not absolute and no
    /// usable origin is configured.
    pub fn resolve_url(&self, endpoint: &str) -> Result<Url, url::ParseError> {
        let joined = format!("{}{endpoint}", self.base_url.trim_end_matches('/'));

        match Url::parse(&joined) {
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.origin {
                Some(origin) => Url::parse(origin)?.join(&joined),
                None => Err(url::ParseError::RelativeUrlWithoutBase),
            },
            other => other,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            origin: None,
            json_content_type: Self::default_json_content_type(),
            request_timeout_seconds: Self::default_request_timeout(),
            connect_timeout_seconds: Self::default_connect_timeout(),
        }
    }
}
