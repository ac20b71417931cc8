//! Client configuration.

use std::env;

/// Base URL of the REST API used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/1.1/";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "TWITTER_API_BASE_URL";

/// Settings shared by every service of a `Client`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    /// Trailing slashes on `base_url` are ignored.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read `TWITTER_API_BASE_URL`, falling back to [`DEFAULT_BASE_URL`]
    /// when it is unset or blank.
    pub fn from_env() -> Self {
        Self::from_base_url_var(env::var(BASE_URL_ENV).ok())
    }

    fn from_base_url_var(value: Option<String>) -> Self {
        match value {
            Some(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
