//! # Cache Types
//!
//! This module defines common types used across the caching system.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Cache key identifying one stored response: request method plus the exact
/// absolute URL, query string included. Default matching semantics are
/// method + exact URL; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// HTTP method of the request
    pub method: String,
    /// Absolute URL of the resource
    pub url: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(method: &Method, url: impl Into<String>) -> Self {
        Self {
            method: method.as_str().to_owned(),
            url: url.into(),
        }
    }

    /// Key for a plain GET of the given URL
    pub fn for_url(url: impl Into<String>) -> Self {
        Self::new(&Method::GET, url)
    }

    /// Convert to a filename-safe string
    pub fn to_filename(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(&self.method);
        hasher.update(":");
        hasher.update(&self.url);

        let hash = hasher.finalize();
        format!("{hash:x}")
    }
}

/// Metadata stored alongside a cached response body. Together with the body
/// bytes it reconstructs the full response snapshot. Entries carry no TTL:
/// cached assets are never revalidated against the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// When the resource was cached (unix seconds)
    pub cached_at: u64,
    /// HTTP status code of the stored response
    pub status: u16,
    /// Response headers as name/value pairs
    pub headers: Vec<(String, String)>,
    /// Content type of the resource
    pub content_type: Option<String>,
    /// Size of the cached body in bytes
    pub size: u64,
}

impl CacheMetadata {
    /// Create new metadata for a stored response
    pub fn new(status: u16, size: u64) -> Self {
        Self {
            cached_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            status,
            headers: Vec::new(),
            content_type: None,
            size,
        }
    }

    /// Capture response headers, skipping values that are not valid UTF-8
    pub fn with_headers(mut self, headers: &HeaderMap) -> Self {
        self.headers = headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();
        self
    }

    /// Set the content type as an Option
    pub fn with_content_type_option(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Rebuild a HeaderMap from the stored pairs, dropping entries that no
    /// longer parse
    pub fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                name.parse::<HeaderName>(),
                HeaderValue::from_str(value),
            ) {
                map.insert(name, value);
            }
        }
        map
    }
}

/// Configuration for the cache system
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Whether caching is enabled
    pub enabled: bool,
    /// Root directory for disk cache storage; buckets live in subdirectories
    pub disk_cache_path: Option<PathBuf>,
    /// Maximum size of disk cache in bytes
    pub max_disk_cache_size: u64,
    /// Maximum size of memory cache in bytes
    pub max_memory_cache_size: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disk_cache_path: None, // If None, we'll use system temp dir
            max_disk_cache_size: 500 * 1024 * 1024, // 500MB
            max_memory_cache_size: 30 * 1024 * 1024, // 30MB
        }
    }
}

/// Result of a cache operation
pub type CacheResult<T> = std::result::Result<T, std::io::Error>;

/// A type representing the result of a cache lookup operation
pub type CacheLookupResult = CacheResult<Option<(Bytes, CacheMetadata)>>;
