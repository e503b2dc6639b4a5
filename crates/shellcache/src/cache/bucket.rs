//! # Cache Bucket
//!
//! One named cache bucket coordinating a memory tier in front of a
//! persistent file tier. The bucket stores full response snapshots keyed by
//! request method and exact URL, and owns the all-or-nothing precache
//! population used at install time.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::try_join_all;
use reqwest::{Method, StatusCode};
use tokio::io;
use tracing::{debug, warn};

use crate::cache::providers::file::FileCache;
use crate::cache::providers::memory::MemoryCache;
use crate::cache::providers::provider::CacheProvider;
use crate::cache::types::{CacheConfig, CacheKey, CacheLookupResult, CacheMetadata, CacheResult};
use crate::error::WorkerError;
use crate::fetch::{FetchRequest, FetchResponse, Fetcher};

/// A named cache bucket handling both memory and file tiers
#[derive(Clone)]
pub struct CacheBucket {
    name: String,
    memory_cache: Arc<MemoryCache>,
    file_cache: Arc<FileCache>,
    disk_enabled: bool,
    config: Arc<CacheConfig>,
}

impl CacheBucket {
    /// Create a new bucket rooted at the given directory
    pub(crate) async fn new(
        name: impl Into<String>,
        bucket_dir: PathBuf,
        config: Arc<CacheConfig>,
    ) -> io::Result<Self> {
        let memory_cache = Arc::new(MemoryCache::new(config.max_memory_cache_size));

        let disk_enabled = config.max_disk_cache_size > 0 && config.enabled;
        let file_cache = Arc::new(FileCache::new(bucket_dir, disk_enabled));

        // Initialize the bucket directory in advance
        if config.enabled {
            file_cache.ensure_initialized().await?;
        }

        Ok(Self {
            name: name.into(),
            memory_cache,
            file_cache,
            disk_enabled,
            config,
        })
    }

    /// Name of this bucket (the version tag)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a value from the bucket
    pub async fn get(&self, key: &CacheKey) -> CacheLookupResult {
        if !self.config.enabled {
            return Ok(None);
        }

        // Check memory tier first
        if let Some((data, metadata)) = self.memory_cache.get(key).await? {
            return Ok(Some((data, metadata)));
        }

        // Try file tier if memory misses
        if let Some((data, metadata)) = self.file_cache.get(key).await? {
            // Store in memory tier for faster access next time
            let _ = self
                .memory_cache
                .put(key.clone(), data.clone(), metadata.clone())
                .await;

            return Ok(Some((data, metadata)));
        }

        Ok(None)
    }

    /// Put a value in the bucket
    pub async fn put(
        &self,
        key: CacheKey,
        data: Bytes,
        metadata: CacheMetadata,
    ) -> CacheResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        // Store in memory tier
        let _ = self
            .memory_cache
            .put(key.clone(), data.clone(), metadata.clone())
            .await;

        // Store in file tier
        self.file_cache.put(key, data, metadata).await
    }

    /// Remove a key from the bucket
    pub async fn remove(&self, key: &CacheKey) -> CacheResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let mem_result = self.memory_cache.remove(key).await;
        let file_result = self.file_cache.remove(key).await;

        // Return file tier error if any, otherwise memory tier error if any
        file_result.or(mem_result)
    }

    /// Clear all entries
    pub async fn clear(&self) -> CacheResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let mem_result = self.memory_cache.clear().await;
        let file_result = self.file_cache.clear().await;

        file_result.or(mem_result)
    }

    /// Check if a key exists in the bucket
    pub async fn contains(&self, key: &CacheKey) -> CacheResult<bool> {
        if !self.config.enabled {
            return Ok(false);
        }

        if self.memory_cache.contains(key).await? {
            return Ok(true);
        }

        self.file_cache.contains(key).await
    }

    /// Number of entries in the bucket
    pub async fn len(&self) -> CacheResult<usize> {
        if !self.config.enabled {
            return Ok(0);
        }

        // The file tier is authoritative when enabled: every committed entry
        // is written through to it
        if self.disk_enabled {
            self.file_cache.len().await
        } else {
            self.memory_cache.len().await
        }
    }

    /// Whether the bucket has no entries
    pub async fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Look up a stored response matching the request. Default matching
    /// semantics: only GET requests match, against the exact URL including
    /// any query string.
    pub async fn match_request(
        &self,
        request: &FetchRequest,
    ) -> CacheResult<Option<FetchResponse>> {
        if request.method != Method::GET {
            return Ok(None);
        }

        let key = CacheKey::new(&request.method, request.url.as_str());
        let Some((data, metadata)) = self.get(&key).await? else {
            return Ok(None);
        };

        let status = match StatusCode::from_u16(metadata.status) {
            Ok(status) => status,
            Err(e) => {
                warn!(
                    key = ?key,
                    status = metadata.status,
                    error = %e,
                    "Stored status code invalid, treating as miss"
                );
                return Ok(None);
            }
        };

        Ok(Some(FetchResponse {
            status,
            headers: metadata.header_map(),
            body: data,
        }))
    }

    /// Store a response snapshot keyed by its request
    pub async fn put_response(
        &self,
        request: &FetchRequest,
        response: &FetchResponse,
    ) -> CacheResult<()> {
        let key = CacheKey::new(&request.method, request.url.as_str());
        let metadata = CacheMetadata::new(response.status.as_u16(), response.body.len() as u64)
            .with_headers(&response.headers)
            .with_content_type_option(response.content_type());

        self.put(key, response.body.clone(), metadata).await
    }

    /// Fetch every request and store all responses, all-or-nothing: the
    /// fetches run concurrently and every one of them must succeed with a
    /// success status before a single entry is committed. On failure the
    /// bucket is left unchanged.
    pub async fn add_all(
        &self,
        fetcher: &dyn Fetcher,
        requests: &[FetchRequest],
    ) -> Result<(), WorkerError> {
        // Stage: fetch everything up front
        let responses = try_join_all(requests.iter().map(|request| async move {
            let response = fetcher.fetch(request).await?;
            if !response.is_success() {
                return Err(WorkerError::StatusCode(
                    response.status,
                    request.url.to_string(),
                ));
            }
            Ok::<_, WorkerError>((request, response))
        }))
        .await?;

        // Commit: write every staged response to the bucket
        for (request, response) in &responses {
            self.put_response(request, response).await?;
        }

        debug!(
            bucket = %self.name,
            entries = responses.len(),
            "Precached manifest into bucket"
        );

        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StubFetcher;
    use reqwest::header::HeaderMap;
    use tempfile::TempDir;

    async fn bucket(dir: &TempDir) -> CacheBucket {
        let config = CacheConfig {
            disk_cache_path: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        CacheBucket::new("v1", dir.path().join("v1"), Arc::new(config))
            .await
            .unwrap()
    }

    fn request(url: &str) -> FetchRequest {
        FetchRequest::get(url).unwrap()
    }

    fn response(body: &'static str) -> FetchResponse {
        FetchResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn test_match_returns_stored_snapshot() {
        let dir = TempDir::new().unwrap();
        let bucket = bucket(&dir).await;

        let req = request("https://app.example.com/web/app.html");
        let mut resp = response("<html>shell</html>");
        resp.headers
            .insert("content-type", "text/html".parse().unwrap());

        bucket.put_response(&req, &resp).await.unwrap();

        let matched = bucket
            .match_request(&req)
            .await
            .unwrap()
            .expect("should match");
        assert_eq!(matched.status, StatusCode::OK);
        assert_eq!(matched.body, resp.body);
        assert_eq!(matched.headers.get("content-type").unwrap(), "text/html");
    }

    #[tokio::test]
    async fn test_match_is_exact_on_url() {
        let dir = TempDir::new().unwrap();
        let bucket = bucket(&dir).await;

        let req = request("https://app.example.com/web/app.html");
        bucket.put_response(&req, &response("shell")).await.unwrap();

        // Query string participates in matching
        let with_query = request("https://app.example.com/web/app.html?v=2");
        assert!(bucket.match_request(&with_query).await.unwrap().is_none());

        let other = request("https://app.example.com/web/other.html");
        assert!(bucket.match_request(&other).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_get_never_matches() {
        let dir = TempDir::new().unwrap();
        let bucket = bucket(&dir).await;

        let get = request("https://app.example.com/web/");
        bucket.put_response(&get, &response("shell")).await.unwrap();

        let post = FetchRequest::new(Method::POST, "https://app.example.com/web/").unwrap();
        assert!(bucket.match_request(&post).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_all_commits_every_entry() {
        let dir = TempDir::new().unwrap();
        let bucket = bucket(&dir).await;

        let fetcher = StubFetcher::new()
            .respond("https://app.example.com/web/", "index")
            .respond("https://app.example.com/web/app.html", "app");

        let requests = vec![
            request("https://app.example.com/web/"),
            request("https://app.example.com/web/app.html"),
        ];

        bucket.add_all(&fetcher, &requests).await.unwrap();

        assert_eq!(bucket.len().await.unwrap(), 2);
        for req in &requests {
            assert!(bucket.match_request(req).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_add_all_is_atomic_on_fetch_failure() {
        crate::test_utils::init_tracing();
        let dir = TempDir::new().unwrap();
        let bucket = bucket(&dir).await;

        let fetcher = StubFetcher::new()
            .respond("https://app.example.com/web/", "index")
            .fail("https://app.example.com/web/app.html");

        let requests = vec![
            request("https://app.example.com/web/"),
            request("https://app.example.com/web/app.html"),
        ];

        let err = bucket.add_all(&fetcher, &requests).await.unwrap_err();
        assert!(matches!(err, WorkerError::IoError(_)));

        // Nothing was committed
        assert!(bucket.is_empty().await.unwrap());
        assert!(
            bucket
                .match_request(&requests[0])
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_add_all_rejects_non_success_status() {
        let dir = TempDir::new().unwrap();
        let bucket = bucket(&dir).await;

        let fetcher = StubFetcher::new().respond("https://app.example.com/web/", "index");

        // The stub answers unknown URLs with 404
        let requests = vec![
            request("https://app.example.com/web/"),
            request("https://app.example.com/web/missing.js"),
        ];

        let err = bucket.add_all(&fetcher, &requests).await.unwrap_err();
        match err {
            WorkerError::StatusCode(status, url) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(url, "https://app.example.com/web/missing.js");
            }
            other => panic!("Expected StatusCode error, got {other:?}"),
        }

        assert!(bucket.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_add_all_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let bucket = bucket(&dir).await;

        let fetcher = StubFetcher::new().respond("https://app.example.com/web/", "index");
        let requests = vec![request("https://app.example.com/web/")];

        bucket.add_all(&fetcher, &requests).await.unwrap();
        bucket.add_all(&fetcher, &requests).await.unwrap();

        assert_eq!(bucket.len().await.unwrap(), 1);
        let matched = bucket
            .match_request(&requests[0])
            .await
            .unwrap()
            .expect("entry present");
        assert_eq!(matched.body, Bytes::from_static(b"index"));
    }
}
