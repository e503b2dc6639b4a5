use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::CacheConfig;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Default version tag for the precache bucket
pub const DEFAULT_CACHE_NAME: &str = "v1";

/// Configurable options for the offline worker
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Name of the cache bucket (the version tag). Bump it when the asset
    /// manifest changes; old buckets are not deleted automatically.
    pub cache_name: String,

    /// Base URL the root-relative manifest entries are resolved against
    pub scope: String,

    /// Root-relative URLs precached at install time
    pub precache_manifest: Vec<String>,

    /// Cache configuration
    pub cache_config: CacheConfig,

    /// Overall timeout for the entire HTTP request
    pub timeout: Duration,

    /// Connection timeout (time to establish initial connection)
    pub connect_timeout: Duration,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// User agent string
    pub user_agent: String,

    /// Custom HTTP headers for requests
    pub headers: HeaderMap,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_owned(),
            scope: String::new(),
            precache_manifest: Vec::new(),
            cache_config: CacheConfig::default(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            follow_redirects: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            headers: WorkerConfig::get_default_headers(),
        }
    }
}

impl WorkerConfig {
    pub fn builder() -> crate::builder::WorkerConfigBuilder {
        crate::builder::WorkerConfigBuilder::new()
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut default_headers = HeaderMap::new();

        default_headers.insert(
            reqwest::header::ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate, br"),
        );

        default_headers.insert(
            reqwest::header::CONNECTION,
            HeaderValue::from_static("keep-alive"),
        );

        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );

        default_headers
    }
}
