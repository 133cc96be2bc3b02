//! Registry Backend Traits
//!
//! Abstraction over the registry search API. The controller only talks to a
//! [`RegistryBackend`], so tests can drive it with an in-memory mock and the
//! binary can plug in [`super::HttpRegistry`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::LookupError;
use crate::query::SearchQuery;

/// Base URL used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Registry backend trait
///
/// `search` returns the raw payload; shape classification happens in the
/// reducer so that both the search and drill-down paths share it.
#[async_trait]
pub trait RegistryBackend: Send + Sync {
    /// Backend name for logs (e.g. "HTTP")
    fn name(&self) -> &str;

    /// Check if the registry is reachable
    async fn health_check(&self) -> bool;

    /// Run one search
    ///
    /// # Errors
    ///
    /// - [`LookupError::NotFound`] for a 404
    /// - [`LookupError::Network`] for transport failures and other error statuses
    /// - [`LookupError::Classification`] when a success body is not JSON
    async fn search(&self, query: &SearchQuery) -> Result<Value, LookupError>;
}

/// Connection settings for the registry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    /// Scheme, host and optional path prefix; `/company` is appended
    pub base_url: String,
    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl BackendConfig {
    /// Config for a base URL with no timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the search endpoint
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/company", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config_default() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        assert_eq!(
            BackendConfig::new("https://registry.example/api/").endpoint(),
            "https://registry.example/api/company"
        );
        assert_eq!(
            BackendConfig::new("http://localhost:8080").endpoint(),
            "http://localhost:8080/company"
        );
    }
}
