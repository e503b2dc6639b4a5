//! # Offline Worker
//!
//! The single component this crate exists for: a version-tagged cache
//! bucket populated from a fixed asset manifest at install time, and a
//! cache-first interception path for every request after that. The host
//! event loop owns event sourcing and calls [`OfflineWorker::install`]
//! once, then [`OfflineWorker::intercept`] per request.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};
use url::Url;

use crate::cache::{CacheBucket, CacheStorage};
use crate::client::create_client;
use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::fetch::{FetchRequest, FetchResponse, Fetcher, HttpFetcher};

/// Lifecycle phase of the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Install has not completed; the bucket may be empty
    Uninstalled,
    /// The manifest has been precached and the worker is serving
    Installed,
}

/// Offline asset cache worker: precaches an asset manifest into a named
/// bucket and answers requests cache-first.
///
/// Interception never writes to the bucket: a cache miss is forwarded to
/// the network and the live response returned as-is, and cached entries are
/// never revalidated. Bumping the configured cache name creates a fresh
/// bucket on the next install; old buckets stay on disk until deleted
/// through [`CacheStorage::delete`].
pub struct OfflineWorker {
    config: WorkerConfig,
    storage: Arc<CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    installed: AtomicBool,
}

impl OfflineWorker {
    /// Create a worker with an HTTP fetcher built from the configuration
    pub async fn new(config: WorkerConfig) -> Result<Self, WorkerError> {
        let client = create_client(&config)?;
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(client));
        Self::with_fetcher(config, fetcher).await
    }

    /// Create a worker over a caller-provided network transport
    pub async fn with_fetcher(
        config: WorkerConfig,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, WorkerError> {
        let storage = Arc::new(CacheStorage::new(config.cache_config.clone()).await?);

        Ok(Self {
            config,
            storage,
            fetcher,
            installed: AtomicBool::new(false),
        })
    }

    /// Current lifecycle phase
    pub fn state(&self) -> WorkerState {
        if self.installed.load(Ordering::Acquire) {
            WorkerState::Installed
        } else {
            WorkerState::Uninstalled
        }
    }

    /// Name of the bucket this worker serves from
    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    /// The bucket storage backing this worker
    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    async fn bucket(&self) -> Result<Arc<CacheBucket>, WorkerError> {
        Ok(self.storage.open(&self.config.cache_name).await?)
    }

    /// Resolve the manifest entries against the configured scope
    fn manifest_requests(&self) -> Result<Vec<FetchRequest>, WorkerError> {
        self.config
            .precache_manifest
            .iter()
            .map(|entry| {
                let url = match Url::parse(entry) {
                    Ok(url) => url,
                    Err(url::ParseError::RelativeUrlWithoutBase) => {
                        Url::parse(&self.config.scope)?.join(entry)?
                    }
                    Err(e) => return Err(e.into()),
                };
                FetchRequest::get(url)
            })
            .collect()
    }

    /// Precache the asset manifest into the version-tagged bucket.
    ///
    /// Opens (creating if absent) the bucket, fetches every manifest URL
    /// concurrently and commits all responses, all-or-nothing: one
    /// unreachable asset or non-success status fails the whole step and
    /// leaves the bucket unchanged. Awaited to completion; the caller must
    /// not route requests to the worker until it resolves. Re-running with
    /// the same tag and manifest is idempotent.
    pub async fn install(&self) -> Result<(), WorkerError> {
        let bucket = self.bucket().await?;
        let requests = self.manifest_requests()?;

        bucket.add_all(self.fetcher.as_ref(), &requests).await?;

        self.installed.store(true, Ordering::Release);
        info!(
            bucket = %self.config.cache_name,
            assets = requests.len(),
            "Offline worker installed"
        );

        Ok(())
    }

    /// Answer one intercepted request, cache-first.
    ///
    /// A GET with a matching bucket entry returns the stored snapshot
    /// without touching the network. Anything else is forwarded to the
    /// network and the live response returned unchanged; the bucket is not
    /// written on a miss, and a failed network fetch propagates to the
    /// caller.
    pub async fn intercept(&self, request: &FetchRequest) -> Result<FetchResponse, WorkerError> {
        let bucket = self.bucket().await?;

        if let Some(response) = bucket.match_request(request).await? {
            debug!(url = %request.url, "Serving request from cache");
            return Ok(response);
        }

        debug!(url = %request.url, "Cache miss, forwarding to network");
        self.fetcher.fetch(request).await
    }
}
