//! # Builder for WorkerConfig
//!
//! This module provides a builder pattern implementation for creating and customizing
//! WorkerConfig instances with a fluent API.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use shellcache::WorkerConfig;
//!
//! let config = WorkerConfig::builder()
//!     .with_cache_name("v2")
//!     .with_scope("https://app.example.com")
//!     .with_asset("/web/")
//!     .with_asset("/web/app.html")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("MyApp/1.0")
//!     .build();
//! ```

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::{CacheConfig, WorkerConfig};

/// Builder for creating WorkerConfig instances with a fluent API
#[derive(Debug, Clone)]
pub struct WorkerConfigBuilder {
    /// Internal config being built
    config: WorkerConfig,
}

impl WorkerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: WorkerConfig::default(),
        }
    }

    /// Set the cache bucket name (the version tag)
    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.config.cache_name = name.into();
        self
    }

    /// Set the base URL the manifest entries are resolved against
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.config.scope = scope.into();
        self
    }

    /// Append a single root-relative URL to the precache manifest
    pub fn with_asset(mut self, url: impl Into<String>) -> Self {
        self.config.precache_manifest.push(url.into());
        self
    }

    /// Set the whole precache manifest, replacing any existing entries
    pub fn with_manifest<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.precache_manifest = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Set the cache configuration
    pub fn with_cache_config(mut self, cache_config: CacheConfig) -> Self {
        self.config.cache_config = cache_config;
        self
    }

    /// Set the overall timeout for the entire HTTP request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout (time to establish initial connection)
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set whether to follow redirects
    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Add a custom HTTP header
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.as_ref().parse::<reqwest::header::HeaderName>(),
            HeaderValue::from_str(value.as_ref()),
        ) {
            self.config.headers.insert(name, value);
        }
        self
    }

    /// Set all HTTP headers, replacing any existing headers
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.config.headers = headers;
        self
    }

    /// Build the WorkerConfig instance
    pub fn build(self) -> WorkerConfig {
        self.config
    }
}

impl Default for WorkerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CACHE_NAME;
    use std::time::Duration;

    #[test]
    fn test_builder_defaults() {
        let config = WorkerConfigBuilder::new().build();
        assert_eq!(config.cache_name, DEFAULT_CACHE_NAME);
        assert!(config.precache_manifest.is_empty());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.follow_redirects);
    }

    #[test]
    fn test_builder_customization() {
        let config = WorkerConfigBuilder::new()
            .with_cache_name("v2")
            .with_scope("https://app.example.com")
            .with_timeout(Duration::from_secs(60))
            .with_connect_timeout(Duration::from_secs(20))
            .with_follow_redirects(false)
            .with_user_agent("CustomUserAgent/1.0")
            .with_header("X-Custom-Header", "CustomValue")
            .build();

        assert_eq!(config.cache_name, "v2");
        assert_eq!(config.scope, "https://app.example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(20));
        assert!(!config.follow_redirects);
        assert_eq!(config.user_agent, "CustomUserAgent/1.0");

        let header_value = config.headers.get("X-Custom-Header").unwrap();
        assert_eq!(header_value.to_str().unwrap(), "CustomValue");
    }

    #[test]
    fn test_manifest_building() {
        let config = WorkerConfigBuilder::new()
            .with_asset("/web/")
            .with_asset("/web/app.html")
            .build();
        assert_eq!(config.precache_manifest, vec!["/web/", "/web/app.html"]);

        let replaced = WorkerConfigBuilder::new()
            .with_asset("/stale.js")
            .with_manifest(["/web/", "/web/manifest.json"])
            .build();
        assert_eq!(
            replaced.precache_manifest,
            vec!["/web/", "/web/manifest.json"]
        );
    }
}
